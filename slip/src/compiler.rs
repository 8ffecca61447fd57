use bytecode::{Code, CodeBuilder, LabelGenerator};
use log::{debug, trace};
use object::{sym, Datum, Registry, SymbolId};

use crate::env::Environment;
use crate::error::CompileError;
use crate::evaluator::Evaluator;
use crate::forms::SpecialForm;

/// Turns datums into [`Code`].
///
/// Every compile threads two flags. `val` asks for a value to be left on the
/// stack; `more` says control falls through to further code afterwards.
/// When `more` is false the generated code ends in `RET` or in a tail
/// `CALL`, which is what makes tail calls free of resume points.
pub struct Compiler<'a, E: Evaluator> {
    registry: &'a mut Registry,
    evaluator: &'a mut E,
    labels: LabelGenerator,
}

impl<'a, E: Evaluator> Compiler<'a, E> {
    pub fn new(registry: &'a mut Registry, evaluator: &'a mut E) -> Self {
        Self {
            registry,
            evaluator,
            labels: LabelGenerator::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &*self.registry
    }

    pub fn compile(
        &mut self,
        form: &Datum,
        env: &Environment<'_>,
        wants_value: bool,
        has_more: bool,
    ) -> Result<Code, CompileError> {
        trace!("compiling {}", self.registry.display(form));
        let mut out = CodeBuilder::new();
        self.comp(&mut out, form, env, wants_value, has_more)?;
        Ok(out.finish())
    }

    /// Compile one top-level form for its value.
    pub fn compile_form(&mut self, form: &Datum) -> Result<Code, CompileError> {
        self.compile(form, &Environment::Empty, true, false)
    }

    /// Compile a sequence of top-level forms as one body; the value of the
    /// last form is returned.
    pub fn compile_toplevel(&mut self, forms: &[Datum]) -> Result<Code, CompileError> {
        let mut out = CodeBuilder::new();
        self.comp_seq(&mut out, forms, &Environment::Empty, true, false)?;
        Ok(out.finish())
    }

    // ── Dispatch ───────────────────────────────────────────────────

    fn comp(
        &mut self,
        out: &mut CodeBuilder,
        form: &Datum,
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        match form {
            Datum::Symbol(name) if !self.is_constant_symbol(*name) => {
                self.comp_var(out, *name, env, val, more);
                Ok(())
            }
            Datum::Cons(cell) => self.comp_list(out, &cell.car, &cell.cdr, env, val, more),
            _ => {
                self.comp_const(out, constant_value(form), val, more);
                Ok(())
            }
        }
    }

    fn comp_list(
        &mut self,
        out: &mut CodeBuilder,
        head: &Datum,
        args: &Datum,
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        if let Datum::Symbol(op) = *head {
            if let Some(form) = SpecialForm::from_symbol(op) {
                return self.comp_special(out, form, args, env, val, more);
            }
            // Macros are looked up by symbol alone; a lexical binding of
            // the same name does not hide them.
            if let Some(transformer) = self.registry.macro_fn(op).cloned() {
                return self.comp_macro(out, &transformer, args, env, val, more);
            }
        }
        self.comp_funcall(out, head, args, env, val, more)
    }

    fn comp_special(
        &mut self,
        out: &mut CodeBuilder,
        form: SpecialForm,
        args: &Datum,
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        let Some(args) = args.to_vec() else {
            return Err(CompileError::ImproperList {
                context: form.name(),
            });
        };
        if !form.accepts(args.len()) {
            let (min, max) = form.arity();
            return Err(CompileError::Arity {
                form: form.name(),
                min,
                max,
                found: args.len(),
            });
        }
        match form {
            SpecialForm::Quote => {
                self.comp_const(out, constant_value(&args[0]), val, more);
                Ok(())
            }
            SpecialForm::Progn => self.comp_seq(out, &args, env, val, more),
            SpecialForm::Set => self.comp_set(out, &args, env, val, more),
            SpecialForm::If => self.comp_if(out, &args, env, val, more),
            SpecialForm::Cc => {
                if val {
                    out.capture_continuation();
                }
                if !more {
                    out.ret();
                }
                Ok(())
            }
            SpecialForm::Defmacro => self.comp_defmacro(out, &args, env, val, more),
            SpecialForm::Lambda => {
                if val {
                    let body = self.comp_lambda(&args[0], &args[1..], env)?;
                    out.closure(body);
                }
                if !more {
                    out.ret();
                }
                Ok(())
            }
        }
    }

    // ── Constants and variables ────────────────────────────────────

    /// `NIL`, `T` and keywords evaluate to themselves.
    fn is_constant_symbol(&self, name: SymbolId) -> bool {
        name == sym::NIL || name == sym::T || self.registry.is_keyword(name)
    }

    fn comp_const(&mut self, out: &mut CodeBuilder, value: Datum, val: bool, more: bool) {
        if val {
            out.constant(value);
        }
        if !more {
            out.ret();
        }
    }

    /// Lexical address of `name`, or `None` if it resolves globally.
    /// Special variables always resolve globally.
    fn lexical_address(&self, name: SymbolId, env: &Environment<'_>) -> Option<(usize, usize)> {
        if self.registry.is_special(name) {
            return None;
        }
        env.lookup(name)
    }

    fn comp_var(&mut self, out: &mut CodeBuilder, name: SymbolId, env: &Environment<'_>, val: bool, more: bool) {
        if val {
            match self.lexical_address(name, env) {
                Some((frame, slot)) => out.local_var(frame, slot),
                None => out.global_var(name),
            }
        }
        if !more {
            out.ret();
        }
    }

    fn comp_set(
        &mut self,
        out: &mut CodeBuilder,
        args: &[Datum],
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        let name = match &args[0] {
            Datum::Symbol(name) if !self.is_constant_symbol(*name) => *name,
            other => {
                return Err(CompileError::SetNonSymbol {
                    target: self.registry.display(other).to_string(),
                });
            }
        };
        self.comp(out, &args[1], env, true, true)?;
        match self.lexical_address(name, env) {
            Some((frame, slot)) => out.local_set(frame, slot),
            None => out.global_set(name),
        }
        if !val {
            out.pop();
        }
        if !more {
            out.ret();
        }
        Ok(())
    }

    // ── Sequencing and control ─────────────────────────────────────

    fn comp_seq(
        &mut self,
        out: &mut CodeBuilder,
        forms: &[Datum],
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        let Some((last, init)) = forms.split_last() else {
            self.comp_const(out, Datum::Nil, val, more);
            return Ok(());
        };
        for form in init {
            self.comp(out, form, env, false, true)?;
        }
        self.comp(out, last, env, val, more)
    }

    fn comp_if(
        &mut self,
        out: &mut CodeBuilder,
        args: &[Datum],
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        self.comp(out, &args[0], env, true, true)?;
        let otherwise = self.labels.fresh();
        out.jump_if_false(otherwise);
        self.comp(out, &args[1], env, val, more)?;
        let join = more.then(|| self.labels.fresh());
        if let Some(join) = join {
            out.jump(join);
        }
        out.place(otherwise);
        match args.get(2) {
            Some(alternative) => self.comp(out, alternative, env, val, more)?,
            None => self.comp_const(out, Datum::Nil, val, more),
        }
        if let Some(join) = join {
            out.place(join);
        }
        Ok(())
    }

    // ── Functions ──────────────────────────────────────────────────

    /// Parameter symbols in slot order, and whether the last one collects
    /// the remaining arguments.
    fn parameters(&self, params: &Datum) -> Result<(Vec<SymbolId>, bool), CompileError> {
        match params {
            Datum::Nil | Datum::Symbol(sym::NIL) => Ok((Vec::new(), false)),
            Datum::Symbol(_) => Ok((vec![self.parameter(params)?], true)),
            Datum::Cons(_) => {
                let (fixed, tail) = params.split_tail();
                let mut vars = fixed
                    .iter()
                    .map(|p| self.parameter(p))
                    .collect::<Result<Vec<_>, _>>()?;
                let rest = match tail {
                    Datum::Nil | Datum::Symbol(sym::NIL) => false,
                    other => {
                        vars.push(self.parameter(&other)?);
                        true
                    }
                };
                Ok((vars, rest))
            }
            other => Err(self.bad_parameter(other)),
        }
    }

    fn parameter(&self, datum: &Datum) -> Result<SymbolId, CompileError> {
        match datum {
            Datum::Symbol(name) if !self.is_constant_symbol(*name) => Ok(*name),
            other => Err(self.bad_parameter(other)),
        }
    }

    fn bad_parameter(&self, datum: &Datum) -> CompileError {
        CompileError::BadParameter {
            parameter: self.registry.display(datum).to_string(),
        }
    }

    /// Body of a closure: argument check, dynamic binds, then the body in
    /// tail position within a new frame.
    fn comp_lambda(
        &mut self,
        params: &Datum,
        body: &[Datum],
        env: &Environment<'_>,
    ) -> Result<Code, CompileError> {
        let (vars, rest) = self.parameters(params)?;
        let mut out = CodeBuilder::new();
        if rest {
            out.arg_rest(vars.len() - 1);
        } else {
            out.args(vars.len());
        }
        for (index, &name) in vars.iter().enumerate().rev() {
            if self.registry.is_special(name) {
                out.bind_dynamic(name, index);
            }
        }
        let inner = env.extend(&vars);
        self.comp_seq(&mut out, body, &inner, true, false)?;
        Ok(out.finish())
    }

    fn comp_funcall(
        &mut self,
        out: &mut CodeBuilder,
        head: &Datum,
        args: &Datum,
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        let Some(args) = args.to_vec() else {
            return Err(CompileError::ImproperList {
                context: "function call",
            });
        };

        if let Datum::Symbol(op) = *head {
            if self.registry.is_primitive(op) && env.lookup(op).is_none() {
                for arg in &args {
                    self.comp(out, arg, env, true, true)?;
                }
                out.prim(op, args.len());
                if !val {
                    out.pop();
                }
                if !more {
                    out.ret();
                }
                return Ok(());
            }
        }

        if let Some(body) = null_lambda_body(head) {
            if !args.is_empty() {
                return Err(CompileError::TooManyArguments { found: args.len() });
            }
            return self.comp_seq(out, &body, env, val, more);
        }

        // Only a call that control comes back to needs a resume point.
        let resume = more.then(|| self.labels.fresh());
        if let Some(resume) = resume {
            out.save(resume);
        }
        for arg in &args {
            self.comp(out, arg, env, true, true)?;
        }
        self.comp(out, head, env, true, true)?;
        out.call(args.len());
        if let Some(resume) = resume {
            out.place(resume);
            if !val {
                out.pop();
            }
        }
        Ok(())
    }

    // ── Macros ─────────────────────────────────────────────────────

    fn comp_defmacro(
        &mut self,
        out: &mut CodeBuilder,
        args: &[Datum],
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        let name = match &args[0] {
            Datum::Symbol(name) if !self.is_constant_symbol(*name) => *name,
            other => {
                return Err(CompileError::MacroName {
                    name: self.registry.display(other).to_string(),
                });
            }
        };
        let body = self.comp_lambda(&args[1], &args[2..], env)?;

        let mut install = CodeBuilder::new();
        install.closure(body);
        install.ret();
        let code = install.finish();

        let program = self.evaluator.assemble(&code).map_err(CompileError::Engine)?;
        let transformer = self
            .evaluator
            .run(&program, &mut *self.registry)
            .map_err(CompileError::Engine)?;
        debug!(
            "installed macro {} as {}",
            self.registry.qualified_name(name),
            self.registry.display(&transformer)
        );
        self.registry.set_macro(name, transformer);

        self.comp_const(out, Datum::Symbol(name), val, more);
        Ok(())
    }

    /// Expand a macro call and compile the expansion in its place. The
    /// transformer runs every time, nothing is cached.
    fn comp_macro(
        &mut self,
        out: &mut CodeBuilder,
        transformer: &Datum,
        args: &Datum,
        env: &Environment<'_>,
        val: bool,
        more: bool,
    ) -> Result<(), CompileError> {
        let Some(args) = args.to_vec() else {
            return Err(CompileError::ImproperList {
                context: "macro call",
            });
        };
        let expansion = self
            .evaluator
            .apply(transformer, &args, &mut *self.registry)
            .map_err(CompileError::Engine)?;
        debug!("macro expanded to {}", self.registry.display(&expansion));
        self.comp(out, &expansion, env, val, more)
    }
}

/// Value loaded by `CONST` for a self-evaluating or quoted datum.
fn constant_value(datum: &Datum) -> Datum {
    match datum {
        Datum::Symbol(sym::NIL) => Datum::Nil,
        Datum::Symbol(sym::T) => Datum::Bool(true),
        other => other.clone(),
    }
}

/// Body of `(LAMBDA () . body)` or `(LAMBDA NIL . body)` in operator
/// position.
fn null_lambda_body(head: &Datum) -> Option<Vec<Datum>> {
    let form = head.to_vec()?;
    let (first, rest) = form.split_first()?;
    if *first != Datum::Symbol(sym::LAMBDA) {
        return None;
    }
    let (params, body) = rest.split_first()?;
    matches!(params, Datum::Nil | Datum::Symbol(sym::NIL)).then(|| body.to_vec())
}

//! The tree-to-text visitor: one formatting method per construct family.

use posh_ast::*;

use crate::buffer::RenderBuffer;
use crate::config::PrintConfig;
use crate::error::PrintError;
use crate::spelling::token_text;

/// Printer that walks a script's syntax tree and appends its canonical
/// textual form to a render buffer.
///
/// One printer serves one render call: construct it, call
/// [`Printer::run`], and it is consumed. Nothing is cached across calls.
pub(crate) struct Printer<'a> {
    buf: RenderBuffer,
    /// Held to match the parser hand-off; printing is driven by the tree
    /// alone.
    #[allow(dead_code)]
    tokens: &'a [Token],
}

impl<'a> Printer<'a> {
    pub fn new(tokens: &'a [Token], config: &PrintConfig) -> Self {
        Self {
            buf: RenderBuffer::new(config),
            tokens,
        }
    }

    pub fn run(mut self, script: &ScriptBlock) -> Result<String, PrintError> {
        self.write_script_block(script, true)?;
        Ok(self.buf.into_string())
    }

    /// The root script block renders bare; nested ones are brace-wrapped
    /// with an indent step. The `end` block's statements render without
    /// an `end { }` wrapper unless another named block forces the
    /// explicit form.
    fn write_script_block(
        &mut self,
        script: &ScriptBlock,
        is_root: bool,
    ) -> Result<(), PrintError> {
        if !is_root {
            self.buf.push_char('{');
            self.buf.indent();
        }

        let mut need_newline = false;
        if let Some(param_block) = &script.param_block {
            need_newline = true;
            self.write_param_block(param_block)?;
        }

        for (i, using) in script.using_statements.iter().enumerate() {
            if i > 0 {
                self.buf.newline();
            }
            self.write_using_statement(using)?;
        }

        let mut explicit_end = false;

        if let Some(block) = &script.dynamic_param_block {
            need_newline = true;
            explicit_end = true;
            self.buf.blank_line();
            self.write_named_block(block)?;
        }

        if let Some(block) = &script.begin_block {
            need_newline = true;
            explicit_end = true;
            self.buf.blank_line();
            self.write_named_block(block)?;
        }

        if let Some(block) = &script.process_block {
            need_newline = true;
            explicit_end = true;
            self.buf.blank_line();
            self.write_named_block(block)?;
        }

        if let Some(end) = &script.end_block {
            if !end.statements.is_empty() || !end.traps.is_empty() {
                if explicit_end {
                    self.buf.blank_line();
                    self.write_named_block(end)?;
                } else {
                    if need_newline {
                        self.buf.blank_line();
                    }
                    self.write_statements(&end.statements, &end.traps)?;
                }
            }
        }

        if !is_root {
            self.buf.dedent();
            self.buf.push_char('}');
        }

        Ok(())
    }

    fn write_named_block(&mut self, block: &NamedBlock) -> Result<(), PrintError> {
        if !block.unnamed {
            self.buf.push(token_text(block.kind)?);
        }
        self.buf.begin_block();
        self.write_statements(&block.statements, &block.traps)?;
        self.buf.end_block();
        Ok(())
    }

    /// A brace-wrapped statement block (loop body, clause body, ...).
    fn write_statement_block(&mut self, block: &StatementBlock) -> Result<(), PrintError> {
        self.buf.begin_block();
        self.write_statements(&block.statements, &block.traps)?;
        self.buf.end_block();
        Ok(())
    }

    /// Statement sequence with the separator rule: one newline between
    /// statements, preceded by an extra blank line when the previous
    /// statement is block-shaped.
    fn write_statements(
        &mut self,
        statements: &[Stmt],
        traps: &[TrapStatement],
    ) -> Result<(), PrintError> {
        let mut wrote_trap = false;
        for trap in traps {
            wrote_trap = true;
            self.write_trap(trap)?;
        }

        let (first, rest) = match statements.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        if wrote_trap {
            self.buf.newline();
        }

        self.write_stmt(first)?;
        let mut previous = first;

        for stmt in rest {
            if is_block_statement(previous) {
                self.buf.end_statement();
            }
            self.buf.newline();
            self.write_stmt(stmt)?;
            previous = stmt;
        }

        Ok(())
    }

    fn write_stmt(&mut self, stmt: &Stmt) -> Result<(), PrintError> {
        match stmt {
            Stmt::Pipeline(pipeline) => self.write_pipeline(pipeline)?,
            Stmt::PipelineChain {
                lhs,
                operator,
                rhs,
                background,
            } => {
                self.write_stmt(lhs)?;
                self.buf.push_char(' ');
                self.buf.push(token_text(*operator)?);
                self.buf.push_char(' ');
                self.write_pipeline(rhs)?;
                if *background {
                    self.buf.push(" &");
                }
            }
            Stmt::Assignment {
                left,
                operator,
                right,
            } => {
                self.write_expr(left)?;
                self.buf.push_char(' ');
                self.buf.push(token_text(*operator)?);
                self.buf.push_char(' ');
                self.write_stmt(right)?;
            }
            Stmt::If {
                clauses,
                else_clause,
            } => {
                let (first, rest) = clauses
                    .split_first()
                    .ok_or_else(|| PrintError::unsupported("an if statement with no clauses"))?;

                self.buf.push("if (");
                self.write_stmt(&first.condition)?;
                self.buf.push_char(')');
                self.write_statement_block(&first.body)?;

                for clause in rest {
                    self.buf.newline();
                    self.buf.push("elseif (");
                    self.write_stmt(&clause.condition)?;
                    self.buf.push_char(')');
                    self.write_statement_block(&clause.body)?;
                }

                if let Some(else_body) = else_clause {
                    self.buf.newline();
                    self.buf.push("else");
                    self.write_statement_block(else_body)?;
                }
            }
            Stmt::While { condition, body } => {
                self.buf.push("while (");
                self.write_stmt(condition)?;
                self.buf.push_char(')');
                self.write_statement_block(body)?;
            }
            Stmt::DoWhile { condition, body } => {
                self.buf.push("do");
                self.write_statement_block(body)?;
                self.buf.push(" while (");
                self.write_stmt(condition)?;
                self.buf.push_char(')');
                self.buf.end_statement();
            }
            Stmt::DoUntil { condition, body } => {
                self.buf.push("do");
                self.write_statement_block(body)?;
                self.buf.push(" until (");
                self.write_stmt(condition)?;
                self.buf.push_char(')');
                self.buf.end_statement();
            }
            Stmt::For {
                initializer,
                condition,
                iterator,
                body,
            } => {
                self.buf.push("for (");
                if let Some(initializer) = initializer {
                    self.write_stmt(initializer)?;
                }
                self.buf.push("; ");
                if let Some(condition) = condition {
                    self.write_stmt(condition)?;
                }
                self.buf.push("; ");
                if let Some(iterator) = iterator {
                    self.write_stmt(iterator)?;
                }
                self.buf.push_char(')');
                self.write_statement_block(body)?;
                self.buf.end_statement();
            }
            Stmt::ForEach {
                variable,
                iterable,
                body,
            } => {
                self.buf.push("foreach (");
                self.write_variable(variable);
                self.buf.push(" in ");
                self.write_stmt(iterable)?;
                self.buf.push_char(')');
                self.write_statement_block(body)?;
                self.buf.end_statement();
            }
            Stmt::Switch {
                label,
                condition,
                clauses,
                default,
            } => {
                if let Some(label) = label {
                    self.buf.push_char(':');
                    self.buf.push(label);
                    self.buf.push_char(' ');
                }

                self.buf.push("switch (");
                self.write_stmt(condition)?;
                self.buf.push_char(')');

                self.buf.begin_block();

                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        self.buf.blank_line();
                    }
                    self.write_expr(&clause.pattern)?;
                    self.write_statement_block(&clause.body)?;
                }

                if let Some(default) = default {
                    if !clauses.is_empty() {
                        self.buf.blank_line();
                    }
                    self.buf.push("default");
                    self.write_statement_block(default)?;
                }

                self.buf.end_block();
            }
            Stmt::Try {
                body,
                catch_clauses,
                finally,
            } => {
                self.buf.push("try");
                self.write_statement_block(body)?;

                for catch in catch_clauses {
                    self.buf.newline();
                    self.write_catch_clause(catch)?;
                }

                if let Some(finally_body) = finally {
                    self.buf.newline();
                    self.buf.push("finally");
                    self.write_statement_block(finally_body)?;
                }
            }
            Stmt::Break { label } => self.write_control_flow_expr("break", label.as_ref())?,
            Stmt::Continue { label } => self.write_control_flow_expr("continue", label.as_ref())?,
            Stmt::Return { pipeline } => {
                self.write_control_flow_stmt("return", pipeline.as_deref())?
            }
            Stmt::Exit { pipeline } => self.write_control_flow_stmt("exit", pipeline.as_deref())?,
            Stmt::Throw { pipeline } => {
                self.write_control_flow_stmt("throw", pipeline.as_deref())?
            }
            Stmt::Function(function) => self.write_function_definition(function)?,
            Stmt::Type(type_def) => self.write_type_definition(type_def)?,
            Stmt::Using(using) => self.write_using_statement(using)?,
            Stmt::Block { .. } => {
                return Err(PrintError::unsupported("workflow block statements"))
            }
            Stmt::Configuration { .. } => {
                return Err(PrintError::unsupported("configuration definitions"))
            }
            Stmt::Data { .. } => return Err(PrintError::unsupported("data statements")),
            Stmt::DynamicKeyword { .. } => {
                return Err(PrintError::unsupported("dynamic keyword statements"))
            }
            Stmt::Error => return Err(PrintError::unsupported("error statements")),
        }

        Ok(())
    }

    fn write_pipeline(&mut self, pipeline: &Pipeline) -> Result<(), PrintError> {
        for (i, element) in pipeline.elements.iter().enumerate() {
            if i > 0 {
                self.buf.push(" | ");
            }
            self.write_pipeline_element(element)?;
        }

        if pipeline.background {
            self.buf.push(" &");
        }

        Ok(())
    }

    fn write_pipeline_element(&mut self, element: &PipelineElement) -> Result<(), PrintError> {
        match element {
            PipelineElement::Command {
                invocation_operator,
                elements,
                redirections,
            } => {
                if let Some(operator) = invocation_operator {
                    self.buf.push(token_text(*operator)?);
                    self.buf.push_char(' ');
                }

                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_char(' ');
                    }
                    self.write_command_element(element)?;
                }

                if !redirections.is_empty() {
                    self.buf.push_char(' ');
                    for (i, redirection) in redirections.iter().enumerate() {
                        if i > 0 {
                            self.buf.push_char(' ');
                        }
                        self.write_redirection(redirection)?;
                    }
                }
            }
            PipelineElement::Expression(expr) => self.write_expr(expr)?,
        }

        Ok(())
    }

    fn write_command_element(&mut self, element: &CommandElement) -> Result<(), PrintError> {
        match element {
            CommandElement::Argument(expr) => self.write_expr(expr)?,
            CommandElement::Parameter { name, argument } => {
                self.buf.push_char('-');
                self.buf.push(name);
                if let Some(argument) = argument {
                    self.buf.push_char(':');
                    self.write_expr(argument)?;
                }
            }
        }

        Ok(())
    }

    fn write_expr(&mut self, expr: &Expr) -> Result<(), PrintError> {
        match expr {
            Expr::Constant(constant) => match constant {
                Constant::Null => self.buf.push("$null"),
                Constant::Bool(true) => self.buf.push("$true"),
                Constant::Bool(false) => self.buf.push("$false"),
                Constant::Int(n) => self.buf.push(&n.to_string()),
                Constant::Float(x) => self.buf.push(&x.to_string()),
            },
            Expr::StringConstant { value, kind } => self.write_string_constant(value, *kind),
            Expr::ExpandableString { value } => {
                // The value keeps its interpolations verbatim.
                self.buf.push_char('"');
                self.buf.push(value);
                self.buf.push_char('"');
            }
            Expr::Variable(variable) => self.write_variable(variable),
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                self.write_expr(left)?;
                self.buf.push_char(' ');
                self.buf.push(token_text(*operator)?);
                self.buf.push_char(' ');
                self.write_expr(right)?;
            }
            Expr::Unary { operator, child } => match operator {
                TokenKind::PlusPlus => {
                    self.buf.push("++");
                    self.write_expr(child)?;
                }
                TokenKind::MinusMinus => {
                    self.buf.push("--");
                    self.write_expr(child)?;
                }
                TokenKind::PostfixPlusPlus => {
                    self.write_expr(child)?;
                    self.buf.push("++");
                }
                TokenKind::PostfixMinusMinus => {
                    self.write_expr(child)?;
                    self.buf.push("--");
                }
                _ => {
                    self.buf.push(token_text(*operator)?);
                    self.buf.push_char(' ');
                    self.write_expr(child)?;
                }
            },
            Expr::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                self.write_expr(condition)?;
                self.buf.push(" ? ");
                self.write_expr(if_true)?;
                self.buf.push(" : ");
                self.write_expr(if_false)?;
            }
            Expr::Member {
                object,
                member,
                static_access,
            } => {
                self.write_expr(object)?;
                self.buf.push(if *static_access { "::" } else { "." });
                self.write_expr(member)?;
            }
            Expr::InvokeMember {
                object,
                member,
                arguments,
                static_access,
            } => {
                self.write_expr(object)?;
                self.buf.push(if *static_access { "::" } else { "." });
                self.write_expr(member)?;
                self.buf.push_char('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(", ");
                    }
                    self.write_expr(argument)?;
                }
                self.buf.push_char(')');
            }
            Expr::BaseCtorCall { arguments } => {
                if !arguments.is_empty() {
                    self.buf.push("base(");
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            self.buf.push(", ");
                        }
                        self.write_expr(argument)?;
                    }
                    self.buf.push_char(')');
                }
            }
            Expr::Index { target, index } => {
                self.write_expr(target)?;
                self.buf.push_char('[');
                self.write_expr(index)?;
                self.buf.push_char(']');
            }
            Expr::ArrayLiteral(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(", ");
                    }
                    self.write_expr(element)?;
                }
            }
            Expr::ArrayExpression(block) => {
                self.buf.push("@(");
                self.write_statements(&block.statements, &block.traps)?;
                self.buf.push_char(')');
            }
            Expr::Hashtable(entries) => self.write_hashtable(entries)?,
            Expr::Paren(pipeline) => {
                self.buf.push_char('(');
                self.write_stmt(pipeline)?;
                self.buf.push_char(')');
            }
            Expr::SubExpression(block) => {
                self.buf.push("$(");
                self.write_statements(&block.statements, &block.traps)?;
                self.buf.push_char(')');
            }
            Expr::ScriptBlock(script) => self.write_script_block(script, false)?,
            Expr::Convert { attribute, child } | Expr::Attributed { attribute, child } => {
                self.write_attribute_spec(attribute)?;
                self.write_expr(child)?;
            }
            Expr::TypeLiteral(type_name) => {
                self.buf.push_char('[');
                self.write_type_name(type_name);
                self.buf.push_char(']');
            }
            Expr::Using(child) => match child.as_ref() {
                Expr::Variable(variable) => {
                    self.buf.push("$using:");
                    self.buf.push(&variable.path);
                }
                _ => {
                    return Err(PrintError::unsupported(
                        "a using expression without a variable child",
                    ))
                }
            },
            Expr::Error => return Err(PrintError::unsupported("error expressions")),
        }

        Ok(())
    }

    fn write_variable(&mut self, variable: &VariableExpr) {
        self.buf
            .push_char(if variable.splatted { '@' } else { '$' });
        self.buf.push(&variable.path);
    }

    fn write_string_constant(&mut self, value: &str, kind: StringKind) {
        match kind {
            StringKind::BareWord => self.buf.push(value),
            StringKind::SingleQuoted => {
                self.buf.push_char('\'');
                self.buf.push(&value.replace('\'', "''"));
                self.buf.push_char('\'');
            }
            StringKind::DoubleQuoted => self.write_double_quoted(value),
            // Here-string bodies are verbatim; the delimiters own their
            // lines regardless of the configured terminator.
            StringKind::SingleQuotedHereString => {
                self.buf.push("@'\n");
                self.buf.push(value);
                self.buf.push("\n'@");
            }
            StringKind::DoubleQuotedHereString => {
                self.buf.push("@\"\n");
                self.buf.push(value);
                self.buf.push("\n\"@");
            }
        }
    }

    fn write_double_quoted(&mut self, value: &str) {
        self.buf.push_char('"');

        for c in value.chars() {
            match c {
                '\0' => self.buf.push("`0"),
                '\u{7}' => self.buf.push("`a"),
                '\u{8}' => self.buf.push("`b"),
                '\u{c}' => self.buf.push("`f"),
                '\n' => self.buf.push("`n"),
                '\r' => self.buf.push("`r"),
                '\t' => self.buf.push("`t"),
                '\u{b}' => self.buf.push("`v"),
                '\u{1b}' => self.buf.push("`e"),
                '`' => self.buf.push("``"),
                '"' => self.buf.push("`\""),
                '$' => self.buf.push("`$"),
                c if (c as u32) < 128 => self.buf.push_char(c),
                c => self.buf.push(&format!("`u{{{:X}}}", c as u32)),
            }
        }

        self.buf.push_char('"');
    }

    fn write_hashtable(&mut self, entries: &[HashEntry]) -> Result<(), PrintError> {
        self.buf.push("@{");

        if entries.is_empty() {
            self.buf.push_char('}');
            return Ok(());
        }

        self.buf.indent();

        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                self.buf.newline();
            }
            self.write_expr(&entry.key)?;
            self.buf.push(" = ");
            self.write_stmt(&entry.value)?;
        }

        self.buf.dedent();
        self.buf.push_char('}');

        Ok(())
    }

    fn write_attribute_spec(&mut self, spec: &AttributeSpec) -> Result<(), PrintError> {
        match spec {
            AttributeSpec::Attribute {
                type_name,
                positional_arguments,
                named_arguments,
            } => {
                self.buf.push_char('[');
                self.write_type_name(type_name);
                self.buf.push_char('(');

                let had_positional = !positional_arguments.is_empty();
                for (i, argument) in positional_arguments.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(", ");
                    }
                    self.write_expr(argument)?;
                }

                for (i, argument) in named_arguments.iter().enumerate() {
                    if i > 0 || had_positional {
                        self.buf.push(", ");
                    }
                    self.write_named_attribute_argument(argument)?;
                }

                self.buf.push(")]");
            }
            AttributeSpec::TypeConstraint(type_name) => {
                self.buf.push_char('[');
                self.write_type_name(type_name);
                self.buf.push_char(']');
            }
        }

        Ok(())
    }

    fn write_named_attribute_argument(
        &mut self,
        argument: &NamedAttributeArgument,
    ) -> Result<(), PrintError> {
        self.buf.push(&argument.name);

        if !argument.expression_omitted {
            if let Some(value) = &argument.argument {
                self.buf.push(" = ");
                self.write_expr(value)?;
            }
        }

        Ok(())
    }

    fn write_type_name(&mut self, name: &TypeName) {
        match name {
            TypeName::Simple(full_name) => self.buf.push(full_name),
            TypeName::Array { element, rank } => {
                self.write_type_name(element);
                if *rank == 1 {
                    self.buf.push("[]");
                } else {
                    self.buf.push_char('[');
                    for _ in 1..*rank {
                        self.buf.push_char(',');
                    }
                    self.buf.push_char(']');
                }
            }
            TypeName::Generic { name, arguments } => {
                self.buf.push(name);
                self.buf.push_char('[');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(", ");
                    }
                    self.write_type_name(argument);
                }
                self.buf.push_char(']');
            }
        }
    }

    fn write_param_block(&mut self, param_block: &ParamBlock) -> Result<(), PrintError> {
        for attribute in &param_block.attributes {
            self.write_attribute_spec(attribute)?;
            self.buf.newline();
        }

        self.buf.push("param(");

        if param_block.parameters.is_empty() {
            self.buf.push_char(')');
            return Ok(());
        }

        self.buf.indent();

        for (i, parameter) in param_block.parameters.iter().enumerate() {
            if i > 0 {
                self.buf.push_char(',');
                self.buf.blank_line();
            }
            self.write_parameter(parameter)?;
        }

        self.buf.dedent();
        self.buf.push_char(')');

        Ok(())
    }

    /// The block form: each attribute on its own line above the variable.
    fn write_parameter(&mut self, parameter: &Parameter) -> Result<(), PrintError> {
        for attribute in &parameter.attributes {
            self.write_attribute_spec(attribute)?;
            self.buf.newline();
        }

        self.write_variable(&parameter.name);

        if let Some(default) = &parameter.default_value {
            self.buf.push(" = ");
            self.write_expr(default)?;
        }

        Ok(())
    }

    /// The signature form used by method parameters: attributes inline.
    fn write_inline_parameter(&mut self, parameter: &Parameter) -> Result<(), PrintError> {
        for attribute in &parameter.attributes {
            self.write_attribute_spec(attribute)?;
        }

        self.write_variable(&parameter.name);

        if let Some(default) = &parameter.default_value {
            self.buf.push(" = ");
            self.write_expr(default)?;
        }

        Ok(())
    }

    fn write_function_definition(
        &mut self,
        function: &FunctionDefinition,
    ) -> Result<(), PrintError> {
        self.buf
            .push(if function.is_filter { "filter " } else { "function " });
        self.buf.push(&function.name);
        self.buf.newline();
        self.write_script_block(&function.body, false)?;
        self.buf.end_statement();

        Ok(())
    }

    fn write_type_definition(&mut self, type_def: &TypeDefinition) -> Result<(), PrintError> {
        match type_def.flavor {
            TypeFlavor::Class => self.buf.push("class "),
            TypeFlavor::Interface => self.buf.push("interface "),
            TypeFlavor::Enum => self.buf.push("enum "),
        }

        self.buf.push(&type_def.name);

        if !type_def.base_types.is_empty() {
            self.buf.push(" : ");
            for (i, base) in type_def.base_types.iter().enumerate() {
                if i > 0 {
                    self.buf.push(", ");
                }
                self.write_type_name(base);
            }
        }

        if type_def.members.is_empty() {
            self.buf.newline();
            self.buf.push_char('{');
            self.buf.newline();
            self.buf.push_char('}');
            return Ok(());
        }

        self.buf.begin_block();

        match type_def.flavor {
            TypeFlavor::Enum => {
                for (i, member) in type_def.members.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_char(',');
                        self.buf.newline();
                    }
                    self.write_enum_member(member)?;
                }
            }
            TypeFlavor::Class => {
                for (i, member) in type_def.members.iter().enumerate() {
                    if i > 0 {
                        self.buf.blank_line();
                    }
                    self.write_member(member)?;
                }
            }
            // Interface bodies have no member surface syntax.
            TypeFlavor::Interface => {}
        }

        self.buf.end_block();

        Ok(())
    }

    fn write_member(&mut self, member: &Member) -> Result<(), PrintError> {
        match member {
            Member::Property(property) => self.write_property_member(property),
            Member::Method(method) => self.write_method_member(method),
        }
    }

    /// Enum members are properties without the `$` sigil: a bare name and
    /// an optional explicit value.
    fn write_enum_member(&mut self, member: &Member) -> Result<(), PrintError> {
        let property = match member {
            Member::Property(property) => property,
            Member::Method(_) => {
                return Err(PrintError::unsupported("a method member in an enum"))
            }
        };

        self.buf.push(&property.name);

        if let Some(value) = &property.initial_value {
            self.buf.push(" = ");
            self.write_expr(value)?;
        }

        Ok(())
    }

    fn write_property_member(&mut self, property: &PropertyMember) -> Result<(), PrintError> {
        if property.is_static {
            self.buf.push("static ");
        }

        if property.is_hidden {
            self.buf.push("hidden ");
        }

        if let Some(property_type) = &property.property_type {
            self.buf.push_char('[');
            self.write_type_name(property_type);
            self.buf.push_char(']');
        }

        self.buf.push_char('$');
        self.buf.push(&property.name);

        if let Some(value) = &property.initial_value {
            self.buf.push(" = ");
            self.write_expr(value)?;
        }

        Ok(())
    }

    fn write_method_member(&mut self, method: &MethodMember) -> Result<(), PrintError> {
        if !method.is_constructor {
            if method.is_static {
                self.buf.push("static ");
            }

            if method.is_hidden {
                self.buf.push("hidden ");
            }

            if let Some(return_type) = &method.return_type {
                self.buf.push_char('[');
                self.write_type_name(return_type);
                self.buf.push_char(']');
            }
        }

        self.buf.push(&method.name);
        self.buf.push_char('(');
        for (i, parameter) in method.parameters.iter().enumerate() {
            if i > 0 {
                self.buf.push(", ");
            }
            self.write_inline_parameter(parameter)?;
        }
        self.buf.push_char(')');

        let (mut statements, traps): (&[Stmt], &[TrapStatement]) = match &method.body.end_block {
            Some(end) => (&end.statements, &end.traps),
            None => (&[], &[]),
        };

        if method.is_constructor {
            // The parser puts the base-constructor invocation (implicit
            // or explicit) first in every constructor body.
            let (first, rest) = statements.split_first().ok_or_else(|| {
                PrintError::unsupported("a constructor body without a base constructor call")
            })?;
            let call = base_ctor_call(first).ok_or_else(|| {
                PrintError::unsupported("a constructor body without a base constructor call")
            })?;

            if let Expr::BaseCtorCall { arguments } = call {
                if !arguments.is_empty() {
                    self.buf.push(" : ");
                    self.write_expr(call)?;
                }
            }

            statements = rest;
        }

        if statements.is_empty() && traps.is_empty() {
            self.buf.newline();
            self.buf.push_char('{');
            self.buf.newline();
            self.buf.push_char('}');
            return Ok(());
        }

        self.buf.begin_block();
        self.write_statements(statements, traps)?;
        self.buf.end_block();

        Ok(())
    }

    fn write_catch_clause(&mut self, clause: &CatchClause) -> Result<(), PrintError> {
        self.buf.push("catch");

        for catch_type in &clause.catch_types {
            self.buf.push(" [");
            self.write_type_name(catch_type);
            self.buf.push_char(']');
        }

        self.write_statement_block(&clause.body)
    }

    fn write_trap(&mut self, trap: &TrapStatement) -> Result<(), PrintError> {
        self.buf.push("trap");

        if let Some(trap_type) = &trap.trap_type {
            self.buf.push(" [");
            self.write_type_name(trap_type);
            self.buf.push_char(']');
        }

        self.write_statement_block(&trap.body)
    }

    fn write_redirection(&mut self, redirection: &Redirection) -> Result<(), PrintError> {
        match redirection {
            Redirection::File { from, target } => {
                if *from != RedirectionStream::Output {
                    self.buf.push_char(stream_indicator(*from));
                }
                self.buf.push_char('>');
                self.write_expr(target)?;
            }
            Redirection::Merge { from, to } => {
                self.buf.push_char(stream_indicator(*from));
                self.buf.push(">&");
                self.buf.push_char(stream_indicator(*to));
            }
        }

        Ok(())
    }

    fn write_using_statement(&mut self, using: &UsingStatement) -> Result<(), PrintError> {
        self.buf.push("using ");
        self.buf.push(match using.kind {
            UsingKind::Assembly => "assembly ",
            UsingKind::Command => "command ",
            UsingKind::Module => "module ",
            UsingKind::Namespace => "namespace ",
            UsingKind::Type => "type ",
        });

        if let Some(specification) = &using.module_specification {
            self.buf.push("@{ ");
            for (i, entry) in specification.iter().enumerate() {
                if i > 0 {
                    self.buf.push("; ");
                }
                self.write_expr(&entry.key)?;
                self.buf.push(" = ");
                self.write_stmt(&entry.value)?;
            }
            self.buf.push(" }");
            self.buf.end_statement();
            return Ok(());
        }

        if let Some(name) = &using.name {
            self.write_expr(name)?;
        }

        if let Some(alias) = &using.alias {
            self.buf.push(" = ");
            self.write_expr(alias)?;
        }

        self.buf.end_statement();

        Ok(())
    }

    fn write_control_flow_expr(
        &mut self,
        keyword: &str,
        child: Option<&Expr>,
    ) -> Result<(), PrintError> {
        self.buf.push(keyword);

        if let Some(child) = child {
            self.buf.push_char(' ');
            self.write_expr(child)?;
        }

        Ok(())
    }

    fn write_control_flow_stmt(
        &mut self,
        keyword: &str,
        child: Option<&Stmt>,
    ) -> Result<(), PrintError> {
        self.buf.push(keyword);

        if let Some(child) = child {
            self.buf.push_char(' ');
            self.write_stmt(child)?;
        }

        Ok(())
    }
}

/// The blank-line heuristic: every statement kind except pipelines,
/// chains, assignments, error statements and the one-line control-flow
/// statements counts as block-shaped.
fn is_block_statement(stmt: &Stmt) -> bool {
    !matches!(
        stmt,
        Stmt::Pipeline(_)
            | Stmt::PipelineChain { .. }
            | Stmt::Assignment { .. }
            | Stmt::Return { .. }
            | Stmt::Throw { .. }
            | Stmt::Exit { .. }
            | Stmt::Break { .. }
            | Stmt::Continue { .. }
            | Stmt::Error
    )
}

/// Match the single-element pipeline wrapping a base-constructor call.
fn base_ctor_call(stmt: &Stmt) -> Option<&Expr> {
    if let Stmt::Pipeline(pipeline) = stmt {
        if let [PipelineElement::Expression(expr @ Expr::BaseCtorCall { .. })] =
            pipeline.elements.as_slice()
        {
            return Some(expr);
        }
    }

    None
}

fn stream_indicator(stream: RedirectionStream) -> char {
    match stream {
        RedirectionStream::All => '*',
        RedirectionStream::Output => '1',
        RedirectionStream::Error => '2',
        RedirectionStream::Warning => '3',
        RedirectionStream::Verbose => '4',
        RedirectionStream::Debug => '5',
        RedirectionStream::Information => '6',
    }
}

//! Rewrites ES module syntax into the bundle's `require`/`exports` protocol.
//!
//! The pass re-parses lowered code and splices text by span, so everything
//! except module declarations reaches the output byte for byte. The result
//! has three parts:
//!
//! 1. a prologue defining `__esModule` and one live getter per export,
//! 2. the `require` calls of every import and re-export, hoisted in source
//!    order (ES modules evaluate their dependencies before their own body),
//! 3. the module body with import/export keywords removed.
//!
//! It also records which transform helpers the body reads from
//! `babelHelpers`, so the emitter can define exactly those.

use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexSet;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingIdentifier, ExportAllDeclaration, Expression, StaticMemberExpression, ExportDefaultDeclaration,
    ExportDefaultDeclarationKind, ExportNamedDeclaration, ImportDeclaration,
    ImportDeclarationSpecifier, Statement,
};
use oxc_ast_visit::{Visit, walk};
use oxc_ecmascript::BoundNames;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use super::{CompileError, CompiledModule, HELPERS_OBJECT};

const BINDING_PREFIX: &str = "__satchel_import_";

pub(super) fn to_require_exports(path: &Path, code: &str) -> Result<CompiledModule, CompileError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        return Err(CompileError::ModuleFormat {
            path: path.to_path_buf(),
            messages: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let mut rewriter = ModuleRewriter::new(code);
    for statement in &parsed.program.body {
        match statement {
            Statement::ImportDeclaration(decl) => rewriter.import(decl),
            Statement::ExportNamedDeclaration(decl) => rewriter.export_named(decl),
            Statement::ExportDefaultDeclaration(decl) => rewriter.export_default(decl),
            Statement::ExportAllDeclaration(decl) => rewriter.export_all(decl),
            _ => {}
        }
    }

    let mut helpers = HelperCollector::default();
    helpers.visit_program(&parsed.program);

    let mut compiled = rewriter.finish();
    compiled.helpers = helpers.names.into_iter().collect();
    Ok(compiled)
}

/// Collects `babelHelpers.<name>` reads.
#[derive(Default)]
struct HelperCollector {
    names: IndexSet<String>,
}

impl<'a> Visit<'a> for HelperCollector {
    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if let Expression::Identifier(object) = &it.object {
            if object.name.as_str() == HELPERS_OBJECT {
                self.names.insert(it.property.name.to_string());
            }
        }
        walk::walk_static_member_expression(self, it);
    }
}

struct Edit {
    start: u32,
    end: u32,
    text: String,
}

struct ModuleRewriter<'s> {
    source: &'s str,
    edits: Vec<Edit>,
    specifiers: IndexSet<String>,
    /// (exported name, expression the getter returns)
    getters: Vec<(String, String)>,
    hoisted: Vec<String>,
    next_binding: usize,
}

impl<'s> ModuleRewriter<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            edits: Vec::new(),
            specifiers: IndexSet::new(),
            getters: Vec::new(),
            hoisted: Vec::new(),
            next_binding: 0,
        }
    }

    fn import(&mut self, decl: &ImportDeclaration<'_>) {
        self.remove(decl.span);
        if decl.import_kind.is_type() {
            return;
        }

        let literal = self.depend_on(decl.source.value.as_str());
        let specifiers = match &decl.specifiers {
            Some(specifiers) if !specifiers.is_empty() => specifiers,
            _ => {
                self.hoisted.push(format!("require({literal});"));
                return;
            }
        };

        let binding = self.require_into_binding(&literal);
        for specifier in specifiers {
            let line = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    if s.import_kind.is_type() {
                        continue;
                    }
                    format!(
                        "var {} = {}{};",
                        s.local.name,
                        binding,
                        property_access(s.imported.name().as_str())
                    )
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    format!("var {} = {}.default;", s.local.name, binding)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    format!("var {} = {};", s.local.name, binding)
                }
            };
            self.hoisted.push(line);
        }
    }

    fn export_named(&mut self, decl: &ExportNamedDeclaration<'_>) {
        if decl.export_kind.is_type() {
            self.remove(decl.span);
            return;
        }

        if let Some(source) = &decl.source {
            self.remove(decl.span);
            let literal = self.depend_on(source.value.as_str());
            let binding = self.require_into_binding(&literal);
            for specifier in decl.specifiers.iter().filter(|s| !s.export_kind.is_type()) {
                self.getters.push((
                    specifier.exported.name().to_string(),
                    format!("{}{}", binding, property_access(specifier.local.name().as_str())),
                ));
            }
            return;
        }

        if let Some(declaration) = &decl.declaration {
            // `export const a = 1, b = 2;` keeps the declaration, drops `export `
            self.replace(decl.span.start, declaration.span().start, String::new());
            let mut names = Vec::new();
            declaration.bound_names(&mut |ident: &BindingIdentifier| {
                names.push(ident.name.to_string());
            });
            for name in names {
                self.getters.push((name.clone(), name));
            }
            return;
        }

        self.remove(decl.span);
        for specifier in decl.specifiers.iter().filter(|s| !s.export_kind.is_type()) {
            self.getters.push((
                specifier.exported.name().to_string(),
                specifier.local.name().to_string(),
            ));
        }
    }

    fn export_default(&mut self, decl: &ExportDefaultDeclaration<'_>) {
        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => match &func.id {
                Some(id) => {
                    self.replace(decl.span.start, func.span.start, String::new());
                    self.getters.push(("default".to_string(), id.name.to_string()));
                }
                None => {
                    self.replace(decl.span.start, func.span.start, "exports.default = ".into());
                    self.replace(func.span.end, func.span.end, ";".into());
                }
            },
            ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
                Some(id) => {
                    self.replace(decl.span.start, class.span.start, String::new());
                    self.getters.push(("default".to_string(), id.name.to_string()));
                }
                None => {
                    self.replace(decl.span.start, class.span.start, "exports.default = ".into());
                    self.replace(class.span.end, class.span.end, ";".into());
                }
            },
            kind => match kind.as_expression() {
                Some(expression) => {
                    self.replace(
                        decl.span.start,
                        expression.span().start,
                        "exports.default = ".into(),
                    );
                }
                None => self.remove(decl.span),
            },
        }
    }

    fn export_all(&mut self, decl: &ExportAllDeclaration<'_>) {
        self.remove(decl.span);
        if decl.export_kind.is_type() {
            return;
        }

        let literal = self.depend_on(decl.source.value.as_str());
        let binding = self.require_into_binding(&literal);
        match &decl.exported {
            Some(exported) => self.getters.push((exported.name().to_string(), binding)),
            None => self.hoisted.push(reexport_all(&binding)),
        }
    }

    /// Record a dependency and return its specifier as a JS string literal.
    fn depend_on(&mut self, specifier: &str) -> String {
        self.specifiers.insert(specifier.to_string());
        string_literal(specifier)
    }

    fn require_into_binding(&mut self, literal: &str) -> String {
        let binding = format!("{}{}", BINDING_PREFIX, self.next_binding);
        self.next_binding += 1;
        self.hoisted.push(format!("var {binding} = require({literal});"));
        binding
    }

    fn remove(&mut self, span: Span) {
        self.replace(span.start, span.end, String::new());
    }

    fn replace(&mut self, start: u32, end: u32, text: String) {
        self.edits.push(Edit { start, end, text });
    }

    fn finish(mut self) -> CompiledModule {
        let mut code = String::with_capacity(self.source.len() + 256);
        code.push_str("\"use strict\";\n");
        code.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
        for (name, expression) in &self.getters {
            let _ = writeln!(
                code,
                "Object.defineProperty(exports, {}, {{ enumerable: true, get: function () {{ return {}; }} }});",
                string_literal(name),
                expression
            );
        }
        for line in &self.hoisted {
            code.push_str(line);
            code.push('\n');
        }

        // Spans never overlap; a stable sort keeps zero-width inserts after
        // the removal that shares their start.
        self.edits.sort_by_key(|edit| edit.start);
        let mut cursor = 0usize;
        for edit in &self.edits {
            let (start, end) = (edit.start as usize, edit.end as usize);
            code.push_str(&self.source[cursor..start]);
            code.push_str(&edit.text);
            cursor = end;
        }
        code.push_str(&self.source[cursor..]);

        CompiledModule {
            import_specifiers: self.specifiers.into_iter().collect(),
            code,
            helpers: Vec::new(),
        }
    }
}

fn reexport_all(binding: &str) -> String {
    format!(
        "Object.keys({binding}).forEach(function (key) {{ \
         if (key === \"default\" || key === \"__esModule\" || Object.prototype.hasOwnProperty.call(exports, key)) return; \
         Object.defineProperty(exports, key, {{ enumerable: true, get: function () {{ return {binding}[key]; }} }}); \
         }});"
    )
}

/// JSON string syntax is valid JavaScript string literal syntax.
pub(crate) fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn property_access(name: &str) -> String {
    if is_identifier_name(name) {
        format!(".{name}")
    } else {
        format!("[{}]", string_literal(name))
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(code: &str) -> CompiledModule {
        to_require_exports(Path::new("test.js"), code).expect("rewrite should succeed")
    }

    #[test]
    fn default_and_named_imports_bind_from_one_require() {
        let out = rewrite("import x, { y as z } from \"./m.js\";\nz(x);\n");
        assert!(out.code.contains("var __satchel_import_0 = require(\"./m.js\");"));
        assert!(out.code.contains("var x = __satchel_import_0.default;"));
        assert!(out.code.contains("var z = __satchel_import_0.y;"));
        assert!(out.code.contains("z(x);"));
    }

    #[test]
    fn side_effect_import_becomes_bare_require() {
        let out = rewrite("import \"./polyfill.js\";\n");
        assert!(out.code.contains("require(\"./polyfill.js\");"));
        assert!(!out.code.contains("__satchel_import_0"));
    }

    #[test]
    fn imports_are_hoisted_above_the_body() {
        let out = rewrite("console.log(\"first\");\nimport \"./late.js\";\n");
        let require_at = out.code.find("require(\"./late.js\")").unwrap();
        let body_at = out.code.find("console.log").unwrap();
        assert!(require_at < body_at);
    }

    #[test]
    fn exported_declarations_get_live_getters() {
        let out = rewrite("export let count = 0;\nexport function bump() { count++; }\n");
        assert!(out.code.contains(
            "Object.defineProperty(exports, \"count\", { enumerable: true, get: function () { return count; } });"
        ));
        assert!(out.code.contains("\"bump\""));
        assert!(out.code.contains("let count = 0;"));
        assert!(!out.code.contains("export "));
    }

    #[test]
    fn default_expression_assigns_in_place() {
        let out = rewrite("const a = 1;\nexport default a + 1;\n");
        assert!(out.code.contains("exports.default = a + 1;"));
    }

    #[test]
    fn anonymous_default_function_is_assigned() {
        let out = rewrite("export default function () { return 1; }\n");
        assert!(out.code.contains("exports.default = function"));
    }

    #[test]
    fn named_default_class_keeps_its_binding() {
        let out = rewrite("export default class Widget {}\n");
        assert!(out.code.contains("class Widget"));
        assert!(out.code.contains("return Widget;"));
    }

    #[test]
    fn export_star_forwards_every_binding() {
        let out = rewrite("export * from \"./all.js\";\nexport * as ns from \"./ns.js\";\n");
        assert_eq!(out.import_specifiers, vec!["./all.js", "./ns.js"]);
        assert!(out.code.contains("Object.keys(__satchel_import_0).forEach"));
        assert!(out.code.contains("\"ns\", { enumerable: true, get: function () { return __satchel_import_1; } }"));
    }

    #[test]
    fn renamed_local_export_uses_exported_name() {
        let out = rewrite("const internal = 1;\nexport { internal as external };\n");
        assert!(out.code.contains("\"external\", { enumerable: true, get: function () { return internal; } }"));
    }

    #[test]
    fn helper_reads_are_collected_once_in_order() {
        let out = rewrite(
            "var a = babelHelpers.objectSpread2({}, b);\n\
             var c = babelHelpers.extends({}, babelHelpers.objectSpread2({}, d));\n\
             var e = other.objectSpread2;\n",
        );
        assert_eq!(out.helpers, vec!["objectSpread2", "extends"]);
    }

    #[test]
    fn modules_without_helpers_report_none() {
        let out = rewrite("export const a = { b: 1 }.b;\n");
        assert!(out.helpers.is_empty());
    }

    #[test]
    fn non_identifier_export_names_use_bracket_access() {
        assert_eq!(property_access("plain"), ".plain");
        assert_eq!(property_access("with-dash"), "[\"with-dash\"]");
        assert_eq!(property_access("default"), ".default");
    }
}

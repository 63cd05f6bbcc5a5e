//! Runtime emitter: module graph in, one self-contained script out.
//!
//! The bundle is a single immediately-invoked function whose only argument is
//! the serialized graph. Every module becomes an entry
//!
//! ```text
//! ["src/a.js"]: {
//!   dependencies: { "./b.js": "src/b.js" },
//!   factory: function (require, exports) { ...compiled code... }
//! }
//! ```
//!
//! and the runtime's `require(canonicalPath)` executes each factory at most
//! once, caching the `exports` object before the factory runs. A module that
//! is re-entered through an import cycle therefore observes the partially
//! populated exports of the module still executing.
//!
//! Module keys are computed so a file named `__proto__` stays an own
//! property, and factories run with `this` undefined as in an ES module.
//!
//! When lowered code reads transform helpers, the whole runtime is wrapped
//! in `(function (babelHelpers) { ... })(Object.freeze({ ... }))` carrying
//! just the helpers in use.

mod helpers;

use std::fmt::Write as _;

use indexmap::IndexSet;
use satchel_graph::{CanonicalPath, GraphIntegrityError, HELPERS_OBJECT, ModuleGraph};
use tracing::debug;

/// Failure to serialize a graph. No partial output is produced.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("entry module '{0}' is not part of the graph")]
    MissingEntry(CanonicalPath),

    #[error("cannot emit an open graph: {0}")]
    Integrity(#[from] GraphIntegrityError),

    #[error("module '{module}' needs transform helper '{helper}', which bundles cannot provide")]
    UnsupportedHelper { module: CanonicalPath, helper: String },

    #[error("failed to serialize module table: {0}")]
    Serialize(#[from] serde_json::Error),
}

const RUNTIME_PRELUDE: &str = r#"(function (modules) {
  var cache = Object.create(null);
  var hasOwn = Object.prototype.hasOwnProperty;

  function require(id) {
    if (hasOwn.call(cache, id)) {
      return cache[id];
    }
    if (!hasOwn.call(modules, id)) {
      throw new Error("Module '" + id + "' is not part of this bundle");
    }
    var module = modules[id];
    var exports = {};
    cache[id] = exports;

    function localRequire(specifier) {
      if (!hasOwn.call(module.dependencies, specifier)) {
        throw new Error("Cannot find module '" + specifier + "' imported by '" + id + "'");
      }
      return require(module.dependencies[specifier]);
    }

    module.factory.call(undefined, localRequire, exports);
    return exports;
  }

"#;

/// Serialize `graph` into a bundle that runs `entry` when evaluated.
///
/// Modules appear in graph (discovery) order, so the same graph always
/// produces byte-identical output.
pub fn emit(graph: &ModuleGraph, entry: &CanonicalPath) -> Result<String, EmitError> {
    if !graph.contains(entry) {
        return Err(EmitError::MissingEntry(entry.clone()));
    }
    graph.verify()?;
    let used = used_helpers(graph)?;

    let capacity = RUNTIME_PRELUDE.len()
        + graph
            .modules()
            .map(|m| m.code().len() + m.path().as_str().len() + 128)
            .sum::<usize>();
    let mut out = String::with_capacity(capacity);

    if !used.is_empty() {
        let _ = writeln!(out, "(function ({HELPERS_OBJECT}) {{");
    }
    out.push_str(RUNTIME_PRELUDE);
    let _ = writeln!(out, "  require({});", serde_json::to_string(entry)?);
    out.push_str("})({\n");

    let mut first = true;
    for module in graph.modules() {
        if !first {
            out.push_str(",\n");
        }
        first = false;

        let _ = write!(
            out,
            "[{}]: {{\n  dependencies: {},\n  factory: function (require, exports) {{\n",
            serde_json::to_string(module.path())?,
            serde_json::to_string(module.dependencies())?
        );
        out.push_str(module.code());
        // The compiled code may end in a line comment
        out.push_str("\n  }\n}");
    }
    out.push_str("\n});\n");
    if !used.is_empty() {
        let _ = writeln!(
            out,
            "}})(Object.freeze({}));",
            helpers::object_literal(used.iter().copied())
        );
    }

    debug!(
        entry = %entry,
        modules = graph.len(),
        helpers = used.len(),
        bytes = out.len(),
        "emitted bundle"
    );
    Ok(out)
}

fn used_helpers(graph: &ModuleGraph) -> Result<IndexSet<&str>, EmitError> {
    let mut used = IndexSet::new();
    for module in graph.modules() {
        for helper in module.helpers() {
            if !helpers::is_supported(helper) {
                return Err(EmitError::UnsupportedHelper {
                    module: module.path().clone(),
                    helper: helper.clone(),
                });
            }
            used.insert(helper.as_str());
        }
    }
    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_graph::oxc::{Allocator, Parser, SourceType};
    use satchel_graph::{DependencyMap, ModuleRecord};
    use std::path::Path;

    fn path(p: &str) -> CanonicalPath {
        let root = Path::new("/project");
        CanonicalPath::from_absolute(root, &root.join(p)).unwrap()
    }

    fn record(p: &str, code: &str, deps: &[(&str, &str)]) -> ModuleRecord {
        let dependencies: DependencyMap = deps
            .iter()
            .map(|(spec, target)| (spec.to_string(), path(target)))
            .collect();
        ModuleRecord::new(path(p), code.to_string(), dependencies)
    }

    fn sample_graph() -> ModuleGraph {
        ModuleGraph::from_records(
            path("main.js"),
            [
                record("main.js", "var a = require(\"./a.js\");", &[("./a.js", "lib/a.js")]),
                record("lib/a.js", "exports.value = 1; // trailing comment", &[]),
            ],
        )
    }

    fn assert_parses(code: &str) {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
        assert!(
            parsed.errors.is_empty(),
            "bundle failed to parse: {:?}\n{}",
            parsed.errors,
            code
        );
        assert_eq!(parsed.program.body.len(), 1, "bundle should be one statement");
    }

    #[test]
    fn output_is_a_single_valid_expression() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert_parses(&bundle);
        assert!(bundle.starts_with("(function (modules) {"));
    }

    #[test]
    fn runtime_ends_by_requiring_the_entry() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert!(bundle.contains("  require(\"main.js\");\n})({\n"));
    }

    #[test]
    fn dependency_tables_use_raw_specifiers() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert!(bundle.contains(r#"dependencies: {"./a.js":"lib/a.js"}"#));
        assert!(bundle.contains(r#"["lib/a.js"]: {"#));
    }

    #[test]
    fn module_cache_has_no_prototype() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert!(bundle.contains("var cache = Object.create(null);"));
    }

    #[test]
    fn proto_named_module_is_an_own_key() {
        let graph = ModuleGraph::from_records(
            path("main.js"),
            [
                record("main.js", "require(\"./__proto__\");", &[("./__proto__", "__proto__")]),
                record("__proto__", "exports.ok = true;", &[]),
            ],
        );
        let bundle = emit(&graph, &path("main.js")).unwrap();
        assert_parses(&bundle);
        assert!(bundle.contains(r#"["__proto__"]: {"#));
        assert!(!bundle.contains("\n\"__proto__\": {"));
    }

    #[test]
    fn factories_run_without_a_receiver() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert!(bundle.contains("module.factory.call(undefined, localRequire, exports);"));
    }

    #[test]
    fn graphs_without_helpers_are_not_wrapped() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert!(!bundle.contains(HELPERS_OBJECT));
    }

    #[test]
    fn used_helpers_wrap_the_runtime() {
        let graph = ModuleGraph::from_records(
            path("main.js"),
            [record("main.js", "var o = babelHelpers.objectSpread2({}, {});", &[])
                .with_helpers(vec!["objectSpread2".to_string()])],
        );
        let bundle = emit(&graph, &path("main.js")).unwrap();
        assert_parses(&bundle);
        assert!(bundle.starts_with("(function (babelHelpers) {\n(function (modules) {"));
        assert!(bundle.contains("  objectSpread2: function (target) {"));
        assert!(bundle.contains("  defineProperty: function"));
        assert!(!bundle.contains("asyncToGenerator"));
        assert!(bundle.trim_end().ends_with("}));"));
    }

    #[test]
    fn unknown_helper_is_an_error() {
        let graph = ModuleGraph::from_records(
            path("main.js"),
            [record("main.js", "", &[]).with_helpers(vec!["wrapAsyncGenerator".to_string()])],
        );
        let err = emit(&graph, &path("main.js")).unwrap_err();
        assert!(matches!(
            err,
            EmitError::UnsupportedHelper { ref helper, .. } if helper == "wrapAsyncGenerator"
        ));
    }

    #[test]
    fn emission_is_deterministic() {
        let graph = sample_graph();
        let first = emit(&graph, &path("main.js")).unwrap();
        let second = emit(&graph.clone(), &path("main.js")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_string_evaluation_in_runtime() {
        let bundle = emit(&sample_graph(), &path("main.js")).unwrap();
        assert!(!bundle.contains("eval("));
        assert!(!bundle.contains("new Function"));
    }

    #[test]
    fn missing_entry_is_an_error() {
        let err = emit(&sample_graph(), &path("other.js")).unwrap_err();
        assert!(matches!(err, EmitError::MissingEntry(_)));
    }

    #[test]
    fn dangling_edge_is_an_error() {
        let graph = ModuleGraph::from_records(
            path("main.js"),
            [record("main.js", "", &[("./gone.js", "gone.js")])],
        );
        let err = emit(&graph, &path("main.js")).unwrap_err();
        assert!(matches!(
            err,
            EmitError::Integrity(GraphIntegrityError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn paths_with_quotes_are_escaped() {
        let graph = ModuleGraph::from_records(
            path("we\"ird.js"),
            [record("we\"ird.js", "exports.ok = true;", &[])],
        );
        let bundle = emit(&graph, &path("we\"ird.js")).unwrap();
        assert_parses(&bundle);
        assert!(bundle.contains(r#"require("we\"ird.js");"#));
    }
}

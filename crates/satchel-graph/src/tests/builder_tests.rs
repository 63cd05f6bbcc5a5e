//! End-to-end graph construction against scratch projects on disk.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::test_utils::{CountingCompiler, TestRuntime, create_test_project};
use crate::{
    CompileError, GraphBuildError, GraphBuilder, GraphConfig, ModuleGraph, OxcCompiler,
    ResolutionError,
};

fn builder_for(root: &Path, compiler: Arc<dyn crate::CompilerService>) -> GraphBuilder {
    GraphBuilder::new(
        GraphConfig::default().with_root(root),
        compiler,
        Arc::new(TestRuntime::new(root.to_path_buf())),
    )
}

async fn build(root: &Path, entry: &str) -> Result<ModuleGraph, GraphBuildError> {
    builder_for(root, Arc::new(OxcCompiler::new()))
        .build(Path::new(entry))
        .await
}

fn deps(graph: &ModuleGraph, path: &str) -> Vec<(String, String)> {
    let record = graph
        .modules()
        .find(|m| m.path().as_str() == path)
        .unwrap_or_else(|| panic!("module {path} missing from graph"));
    record
        .dependencies()
        .iter()
        .map(|(spec, target)| (spec.clone(), target.to_string()))
        .collect()
}

#[tokio::test]
async fn chain_produces_one_record_per_module() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("main.js", "import { a } from \"./a.js\";\nconsole.log(a);\n"),
            ("a.js", "import { b } from \"./b.js\";\nexport const a = b + 1;\n"),
            ("b.js", "export const b = 1;\n"),
        ],
    );

    let graph = build(temp.path(), "main.js").await.unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.entry().as_str(), "main.js");
    assert_eq!(
        graph.paths().map(|p| p.as_str()).collect::<Vec<_>>(),
        vec!["main.js", "a.js", "b.js"]
    );
    assert_eq!(deps(&graph, "main.js"), vec![("./a.js".into(), "a.js".into())]);
    assert_eq!(deps(&graph, "a.js"), vec![("./b.js".into(), "b.js".into())]);
    assert!(deps(&graph, "b.js").is_empty());
}

#[tokio::test]
async fn shared_dependency_is_compiled_once() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("main.js", "import \"./left/x.js\";\nimport \"./right/y.js\";\n"),
            ("left/x.js", "import { s } from \"../shared.js\";\nexport const x = s;\n"),
            ("right/y.js", "import { s } from \"../lib/../shared.js\";\nexport const y = s;\n"),
            ("shared.js", "export const s = \"shared\";\n"),
        ],
    );

    let counting = Arc::new(CountingCompiler::new(Arc::new(OxcCompiler::new())));
    let graph = builder_for(temp.path(), counting.clone())
        .build(Path::new("main.js"))
        .await
        .unwrap();

    assert_eq!(graph.len(), 4);
    assert_eq!(counting.calls_for(&temp.path().join("shared.js")), 1);
    assert_eq!(counting.total_calls(), 4);

    assert_eq!(deps(&graph, "left/x.js")[0].1, "shared.js");
    assert_eq!(deps(&graph, "right/y.js")[0].1, "shared.js");
}

#[tokio::test]
async fn every_edge_points_into_the_graph() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("src/index.js", "export * from \"./util/index.js\";\nexport { v } from \"./version.js\";\n"),
            ("src/util/index.js", "export * from \"./math.js\";\nexport * from \"./text.js\";\n"),
            ("src/util/math.js", "import { v } from \"../version.js\";\nexport const add = (a, b) => a + b + v;\n"),
            ("src/util/text.js", "export const upper = (s) => s.toUpperCase();\n"),
            ("src/version.js", "export const v = 0;\n"),
        ],
    );

    let graph = build(temp.path(), "src/index.js").await.unwrap();

    assert_eq!(graph.len(), 5);
    assert!(graph.verify().is_ok());
    for record in graph.modules() {
        for target in record.dependencies().values() {
            assert!(graph.contains(target), "{target} missing");
        }
    }
}

#[tokio::test]
async fn import_cycles_terminate() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("a.js", "import { b } from \"./b.js\";\nexport const a = () => b;\n"),
            ("b.js", "import { a } from \"./a.js\";\nexport const b = () => a;\n"),
        ],
    );

    let graph = build(temp.path(), "a.js").await.unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(deps(&graph, "b.js"), vec![("./a.js".into(), "a.js".into())]);
}

#[tokio::test]
async fn repeated_builds_are_identical() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("main.js", "import \"./c.js\";\nimport \"./b.js\";\nimport \"./a.js\";\n"),
            ("a.js", "export default 1;\n"),
            ("b.js", "import \"./a.js\";\n"),
            ("c.js", "import \"./b.js\";\n"),
        ],
    );

    let first = build(temp.path(), "main.js").await.unwrap();
    let second = build(temp.path(), "main.js").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.paths().map(|p| p.as_str()).collect::<Vec<_>>(),
        vec!["main.js", "c.js", "b.js", "a.js"]
    );
}

#[tokio::test]
async fn missing_import_aborts_with_importer_context() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("main.js", "import \"./a.js\";\n"),
            ("a.js", "import \"./gone.js\";\n"),
        ],
    );

    let err = build(temp.path(), "main.js").await.unwrap_err();
    match err {
        GraphBuildError::Resolution {
            importer,
            specifier,
            source: ResolutionError::NotFound { .. },
        } => {
            assert_eq!(importer.as_str(), "a.js");
            assert_eq!(specifier, "./gone.js");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn compile_error_aborts_with_path() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("main.js", "import \"./broken.js\";\n"),
            ("broken.js", "export const = ;\n"),
        ],
    );

    let err = build(temp.path(), "main.js").await.unwrap_err();
    assert!(matches!(
        err,
        GraphBuildError::Compile { ref path, source: CompileError::Parse { .. } } if path.as_str() == "broken.js"
    ));
    assert_eq!(err.module_path().as_deref(), Some("broken.js"));
}

#[tokio::test]
async fn missing_entry_is_reported() {
    let temp = TempDir::new().unwrap();
    let err = build(temp.path(), "nope.js").await.unwrap_err();
    assert!(matches!(err, GraphBuildError::Entry { .. }));
}

#[tokio::test]
async fn module_limit_is_enforced() {
    let temp = TempDir::new().unwrap();
    create_test_project(
        temp.path(),
        &[
            ("main.js", "import \"./a.js\";\n"),
            ("a.js", "import \"./b.js\";\n"),
            ("b.js", ""),
        ],
    );

    let builder = GraphBuilder::new(
        GraphConfig::default()
            .with_root(temp.path())
            .with_max_modules(Some(2)),
        Arc::new(OxcCompiler::new()),
        Arc::new(TestRuntime::new(temp.path().to_path_buf())),
    );
    let err = builder.build(Path::new("main.js")).await.unwrap_err();
    assert!(matches!(err, GraphBuildError::TooManyModules { max: 2, .. }));
}

#[tokio::test]
async fn oversized_files_are_rejected() {
    let temp = TempDir::new().unwrap();
    create_test_project(temp.path(), &[("main.js", "export const big = \"0123456789\";\n")]);

    let config = GraphConfig {
        max_file_size: 8,
        ..GraphConfig::default().with_root(temp.path())
    };
    let builder = GraphBuilder::new(
        config,
        Arc::new(OxcCompiler::new()),
        Arc::new(TestRuntime::new(temp.path().to_path_buf())),
    );
    let err = builder.build(Path::new("main.js")).await.unwrap_err();
    assert!(matches!(err, GraphBuildError::FileTooLarge { max: 8, .. }));
}

#[tokio::test]
async fn root_defaults_to_runtime_cwd() {
    let temp = TempDir::new().unwrap();
    create_test_project(temp.path(), &[("main.js", "export {};\n")]);

    let builder = GraphBuilder::new(
        GraphConfig::default(),
        Arc::new(OxcCompiler::new()),
        Arc::new(TestRuntime::new(temp.path().to_path_buf())),
    );
    let graph = builder.build(Path::new("main.js")).await.unwrap();
    assert_eq!(graph.entry().as_str(), "main.js");
}

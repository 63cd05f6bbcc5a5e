//! Execution tests: run emitted bundles with node and check module semantics.
//!
//! Each test returns early when `node` is not installed.

#![allow(clippy::disallowed_methods)]

mod helpers;

use std::path::Path;

use satchel_bundler::test_utils::create_test_project;
use satchel_bundler::{CanonicalPath, DependencyMap, ModuleGraph, ModuleRecord, emit};
use tempfile::TempDir;

use helpers::{build_project, node_available, run_with_node};

async fn run_project(files: &[(&str, &str)], entry: &str) -> helpers::NodeRun {
    let temp = TempDir::new().unwrap();
    create_test_project(temp.path(), files);
    let result = build_project(temp.path(), entry).await;
    run_with_node(temp.path(), &result.bundle)
}

#[tokio::test]
async fn dependencies_run_before_dependents() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            ("main.js", "import { a } from \"./a.js\";\nconsole.log(\"main \" + a);\n"),
            ("a.js", "import { b } from \"./b.js\";\nconsole.log(\"a\");\nexport const a = b + 1;\n"),
            ("b.js", "console.log(\"b\");\nexport const b = 1;\n"),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["b", "a", "main 2"]);
}

#[tokio::test]
async fn top_level_names_do_not_collide() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                "import { getA } from \"./a.js\";\nimport { getB } from \"./b.js\";\nconst secret = \"main\";\nconsole.log(secret, getA(), getB());\n",
            ),
            ("a.js", "const secret = \"a\";\nexport function getA() { return secret; }\n"),
            ("b.js", "const secret = \"b\";\nexport function getB() { return secret; }\n"),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["main a b"]);
}

#[tokio::test]
async fn one_exports_object_per_module() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                concat!(
                    "import { token as viaLeft, ns } from \"./left.js\";\n",
                    "import { same } from \"./right.js\";\n",
                    "import * as direct from \"./shared.js\";\n",
                    "console.log(viaLeft === same, viaLeft === direct.token, ns === direct);\n",
                ),
            ),
            (
                "left.js",
                "export { token } from \"./shared.js\";\nexport * as ns from \"./shared.js\";\n",
            ),
            (
                "right.js",
                "import { token } from \"./nested/../shared.js\";\nexport const same = token;\n",
            ),
            ("shared.js", "console.log(\"shared ran\");\nexport const token = {};\n"),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["shared ran", "true true true"]);
}

#[tokio::test]
async fn exports_are_live_bindings() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                "import * as counter from \"./counter.js\";\ncounter.bump();\ncounter.bump();\nconsole.log(counter.count);\n",
            ),
            (
                "counter.js",
                "export let count = 0;\nexport function bump() { count += 1; }\n",
            ),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["2"]);
}

#[tokio::test]
async fn default_exports_round_trip() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                concat!(
                    "import greet from \"./greet.js\";\n",
                    "import answer from \"./answer.js\";\n",
                    "import Shape from \"./shape.js\";\n",
                    "console.log(greet(\"x\"), answer, new Shape().sides);\n",
                ),
            ),
            ("greet.js", "export default function greet(name) { return \"hi \" + name; }\n"),
            ("answer.js", "export default 40 + 2;\n"),
            ("shape.js", "export default class { constructor() { this.sides = 3; } }\n"),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["hi x 42 3"]);
}

#[tokio::test]
async fn cycles_see_hoisted_functions() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "a.js",
                "import { b } from \"./b.js\";\nexport function a() { return \"a\"; }\nconsole.log(b());\n",
            ),
            (
                "b.js",
                "import { a } from \"./a.js\";\nexport function b() { return \"b:\" + a(); }\n",
            ),
        ],
        "a.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["b:a"]);
}

#[tokio::test]
async fn typescript_modules_are_stripped() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.ts",
                "import { double } from \"./util.ts\";\nconst n: number = 21;\nconsole.log(double(n));\n",
            ),
            ("util.ts", "export const double = (n: number): number => n * 2;\n"),
        ],
        "main.ts",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["42"]);
}

#[tokio::test]
async fn lowered_spread_and_async_run_with_bundled_helpers() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                concat!(
                    "import { merge, twice } from \"./merge.js\";\n",
                    "const base = { a: 1 };\n",
                    "const merged = merge(base, { b: 2 });\n",
                    "const { a: first, ...rest } = merged;\n",
                    "console.log(JSON.stringify(merged), merged === base);\n",
                    "console.log(first, JSON.stringify(rest));\n",
                    "twice(21).then((n) => console.log(\"async \" + n));\n",
                ),
            ),
            (
                "merge.js",
                concat!(
                    "export const merge = (x, y) => ({ ...x, ...y, c: 3 });\n",
                    "export async function twice(value) {\n",
                    "  const v = await Promise.resolve(value);\n",
                    "  return v * 2;\n",
                    "}\n",
                ),
            ),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(
        run.lines(),
        vec![r#"{"a":1,"b":2,"c":3} false"#, r#"1 {"b":2,"c":3}"#, "async 42"]
    );
}

#[tokio::test]
async fn module_this_is_undefined() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                "import { kind } from \"./dep.js\";\nconsole.log(typeof this, kind);\n",
            ),
            ("dep.js", "export const kind = typeof this;\n"),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["undefined undefined"]);
}

#[tokio::test]
async fn module_named_proto_is_loaded() {
    if !node_available() {
        return;
    }

    let run = run_project(
        &[
            (
                "main.js",
                "import { ok } from \"./__proto__\";\nconsole.log(ok);\n",
            ),
            ("__proto__", "export const ok = \"own key\";\n"),
        ],
        "main.js",
    )
    .await;

    assert!(run.success, "{}", run.stderr);
    assert_eq!(run.lines(), vec!["own key"]);
}

#[tokio::test]
async fn unknown_specifier_throws_naming_module() {
    if !node_available() {
        return;
    }

    let root = Path::new("/project");
    let main = CanonicalPath::from_absolute(root, &root.join("main.js")).unwrap();
    let graph = ModuleGraph::from_records(
        main.clone(),
        [ModuleRecord::new(
            main.clone(),
            "require(\"./nope.js\");".to_string(),
            DependencyMap::new(),
        )],
    );
    let bundle = emit(&graph, &main).unwrap();

    let temp = TempDir::new().unwrap();
    let run = run_with_node(temp.path(), &bundle);

    assert!(!run.success);
    assert!(
        run.stderr
            .contains("Cannot find module './nope.js' imported by 'main.js'"),
        "{}",
        run.stderr
    );
}

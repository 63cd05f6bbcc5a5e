//! Syntax lowering: TypeScript stripping and down-leveling to the target.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{HelperLoaderMode, TransformOptions, Transformer};

use super::CompileError;

/// Source type for a file, always parsed as an ES module.
pub(super) fn source_type_for(path: &Path) -> SourceType {
    SourceType::from_path(path)
        .unwrap_or_else(|_| SourceType::mjs())
        .with_module(true)
}

/// Transformer options for `target`.
///
/// Helpers are referenced as `babelHelpers.<name>` rather than imported from
/// a runtime package; the emitted bundle defines the ones the graph uses.
pub(super) fn transform_options(target: &str) -> Result<TransformOptions, CompileError> {
    let mut options =
        TransformOptions::from_target(target).map_err(|reason| CompileError::InvalidTarget {
            target: target.to_string(),
            reason,
        })?;
    options.helper_loader.mode = HelperLoaderMode::External;
    Ok(options)
}

/// Parse `source`, run the transformer and print the lowered program.
///
/// Module declarations are left in place; the module format pass rewrites
/// them afterwards.
pub(super) fn lower(
    path: &Path,
    source: &str,
    options: &TransformOptions,
) -> Result<String, CompileError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type_for(path)).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        return Err(CompileError::Parse {
            path: path.to_path_buf(),
            messages: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let mut program = parsed.program;
    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let transformed =
        Transformer::new(&allocator, path, options).build_with_scoping(scoping, &mut program);
    if !transformed.errors.is_empty() {
        return Err(CompileError::Transform {
            path: path.to_path_buf(),
            messages: transformed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    Ok(Codegen::new().build(&program).code)
}

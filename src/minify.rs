//! Asset minification for JS and CSS files.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Handlers treat these
//! as opaque transforms: `None` means "publish the bytes unchanged".

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css_strips_whitespace() {
        let out = minify_css("body { color: red; }").unwrap();
        assert_eq!(out, "body{color:red}");
    }

    #[test]
    fn test_minify_css_rewrites_values() {
        let out = minify_css("a { color: #ff0000; }").unwrap();
        assert_eq!(out, "a{color:red}");
    }

    #[test]
    fn test_minify_js_shrinks() {
        let source = "const answer = 40 + 2;\nconsole.log( answer );\n";
        let out = minify_js(source).unwrap();
        assert!(out.len() < source.len());
        assert!(out.contains("console.log"));
    }

    #[test]
    fn test_minify_js_invalid_input() {
        assert!(minify_js("const = ;;;").is_none());
    }
}

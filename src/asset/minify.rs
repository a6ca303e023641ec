//! Bundle minification for JS and CSS content.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use std::path::PathBuf;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::config::JsConfig;

/// Minified script output: code plus its source map JSON.
#[derive(Debug)]
pub struct MinifiedJs {
    pub code: String,
    pub map: Option<String>,
}

/// Minify JavaScript source code.
///
/// `map_name` is the source-map file name embedded in the emitted map.
/// Returns `None` when the source does not parse.
pub fn minify_js(source: &str, map_name: &str, config: &JsConfig) -> Option<MinifiedJs> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: config.mangle.then(MangleOptions::default),
        compress: config.compress.then(CompressOptions::smallest),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let out = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: if config.comments {
                CommentOptions::default()
            } else {
                CommentOptions::disabled()
            },
            source_map_path: Some(PathBuf::from(map_name)),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program);
    Some(MinifiedJs {
        code: out.code,
        map: out.map.map(|map| map.to_json_string()),
    })
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
    fn test_minify_js() {
        let out = minify_js(
            "function add(first, second) { return first + second; }\nconsole.log(add(1, 2));",
            "v1.js.map",
            &JsConfig::default(),
        )
        .unwrap();
        assert!(!out.code.is_empty());
        assert!(out.code.len() < 90);
        let map = out.map.unwrap();
        assert!(map.contains("v1.js.map") || map.contains("mappings"));
    }

    #[test]
    fn test_minify_js_parse_error() {
        assert!(minify_js("var a = ;", "v1.js.map", &JsConfig::default()).is_none());
    }

    #[test]
    fn test_minify_js_without_mangle() {
        let config = JsConfig {
            mangle: false,
            compress: false,
            comments: false,
        };
        let out = minify_js(
            "function add(first, second) { return first + second; }",
            "v1.js.map",
            &config,
        )
        .unwrap();
        assert!(out.code.contains("first"));
    }

    #[test]
    fn test_minify_css() {
        let out = minify_css("body {  color:  red;  }").unwrap();
        assert!(out.contains("red"));
        assert!(out.len() < "body {  color:  red;  }".len());
    }
}

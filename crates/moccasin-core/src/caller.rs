//! Caller identity resolution from the live call stack.
//!
//! Host methods never pass their own name: when a method consults the
//! registry, the registry asks this module which function sits directly
//! above the mock layer on the stack, and that bare name becomes the lookup
//! key. Resolution walks the stack with `backtrace`, skipping every frame
//! that belongs to the resolver or the registry themselves, and short-names
//! the first frame outside that layer.

use thiserror::Error;

/// Demangled-symbol marker for the resolver's own frames.
const RESOLVER_PATH: &str = concat!(module_path!(), "::resolve_caller_name");

/// Failure to identify the consulting method.
///
/// Never surfaced through the public API: the registry treats any resolution
/// failure as "no mock registered" so real logic keeps running.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ResolveError {
    /// The walk ran out of frames before leaving the mock layer.
    #[error("no caller frame above the mock consultation")]
    NoCallerFrame,
    /// A caller frame exists but carries no resolvable symbol name.
    #[error("caller frame has no resolvable symbol")]
    UnresolvedSymbol,
}

/// Resolve the bare name of the function that invoked the consulting
/// operation.
#[inline(never)]
pub(crate) fn resolve_caller_name() -> Result<String, ResolveError> {
    let mut entered_mock_layer = false;
    let mut frames_past_layer = false;
    let mut resolved: Option<String> = None;

    backtrace::trace(|frame| {
        let mut in_layer = false;
        backtrace::resolve_frame(frame, |symbol| {
            let Some(symbol_name) = symbol.name() else {
                return;
            };
            let demangled = format!("{:#}", symbol_name);
            if demangled.contains(RESOLVER_PATH)
                || demangled.contains(crate::mocks::registry::TYPE_PATH)
            {
                in_layer = true;
            } else if entered_mock_layer && resolved.is_none() {
                resolved = Some(short_name(&demangled).to_owned());
            }
        });
        if in_layer {
            entered_mock_layer = true;
        } else if entered_mock_layer {
            frames_past_layer = true;
        }
        resolved.is_none()
    });

    match resolved {
        Some(name) => Ok(name),
        None if entered_mock_layer && frames_past_layer => Err(ResolveError::UnresolvedSymbol),
        None => Err(ResolveError::NoCallerFrame),
    }
}

/// Reduce a fully qualified symbol to the bare method or function name.
///
/// Handles the shapes a walked frame can produce: monomorphized names with
/// type arguments, trailing hash or closure segments, `::`-qualified Rust
/// paths, and dot-qualified foreign symbols with a path prefix.
pub(crate) fn short_name(full: &str) -> &str {
    let mut name = full;
    if name.ends_with('>') {
        if let Some(idx) = name.find("::<") {
            name = &name[..idx];
        }
    }
    while let Some(idx) = name.rfind("::") {
        let tail = &name[idx + 2..];
        if tail == "{{closure}}" || is_symbol_hash(tail) {
            name = &name[..idx];
        } else {
            name = tail;
            break;
        }
    }
    strip_qualifiers(name)
}

/// Strip a `path/prefix.` and any remaining receiver qualifier, leaving the
/// identifier after the last dot.
fn strip_qualifiers(name: &str) -> &str {
    let start = name.rfind('/').map_or(0, |idx| idx + 1);
    match name[start..].rfind('.') {
        Some(dot) => &name[start + dot + 1..],
        None => &name[start..],
    }
}

/// Trailing segment produced by symbol mangling: `h` followed by 16 hex
/// digits.
fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("demo::client::Client::fetch_user", "fetch_user")]
    #[case("<demo::client::Client>::fetch_user", "fetch_user")]
    #[case("<demo::client::Client as core::fmt::Display>::fmt", "fmt")]
    #[case("demo::client::Client::fetch_user::h1f2e3d4c5b6a7988", "fetch_user")]
    #[case("demo::client::Client::fetch_user::{{closure}}", "fetch_user")]
    #[case(
        "demo::client::Client::fetch_as::<alloc::string::String>",
        "fetch_as"
    )]
    fn test_short_name_rust_symbols(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_name(input), expected);
    }

    #[rstest]
    #[case("github.com/mypackage.(*MyStruct).myFunc", "myFunc")]
    #[case("(*MyStruct).myFunc", "myFunc")]
    #[case("myFunc", "myFunc")]
    fn test_short_name_dotted_symbols(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_name(input), expected);
    }

    #[rstest]
    #[case("h0123456789abcdef", true)]
    #[case("h0123456789ABCDEF", true)]
    #[case("h0123456789abcde", false)]
    #[case("hx123456789abcdef", false)]
    #[case("fetch_user", false)]
    fn test_is_symbol_hash(#[case] segment: &str, #[case] expected: bool) {
        assert_eq!(is_symbol_hash(segment), expected);
    }

    #[rstest]
    fn test_resolve_error_display() {
        assert!(ResolveError::NoCallerFrame.to_string().contains("no caller frame"));
        assert!(ResolveError::UnresolvedSymbol
            .to_string()
            .contains("no resolvable symbol"));
    }
}

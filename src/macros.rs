// src/macros.rs
//! Owned-string shorthands for building notes, labels and CSV cells.

/// `s!()` is an empty `String`; `s!(x)` is `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate two or more `&str`-like pieces into one `String`,
/// e.g. `join!(label, ": ", reason)`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $(
            out.push_str($rest);
        )+
        out
    }};
}

// src/macros.rs

/// `String` shorthand: `s!()` for an empty string, `s!(x)` for `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate string-ish pieces into one owned `String`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Format an optional float with fixed precision; `None` becomes an empty cell.
#[macro_export]
macro_rules! opt_cell {
    ($value:expr, $prec:expr) => {
        match $value {
            Some(v) => format!("{:.*}", $prec, v),
            None => $crate::s!(),
        }
    };
}

//! Scanning shortcuts over a [`Scanner`](crate::Scanner).

/// Skips spaces and horizontal tabs.
#[macro_export]
macro_rules! space {
    ($reader:ident) => {{
        $reader.read_while($crate::util::is_space);
    }};
}

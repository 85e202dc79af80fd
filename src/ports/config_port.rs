//! Raw configuration source port.

/// Untyped access to a sectioned key/value source.
///
/// Typing, defaulting and validation happen in the domain against this trait,
/// so any source that can answer these questions can back a `Configuration`.
pub trait ConfigPort {
    /// Name used in error messages, e.g. the file path.
    fn source_name(&self) -> &str;
    /// Sections in source order.
    fn sections(&self) -> Vec<String>;
    /// Keys of `section` in source order; empty if the section is absent.
    fn keys(&self, section: &str) -> Vec<String>;
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// 1-based line of the key's definition, when the source has lines.
    fn line_of(&self, section: &str, key: &str) -> Option<usize>;
}

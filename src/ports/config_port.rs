//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `default` when the key is absent or blank; `Err` when it is not an integer.
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, String>;
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>>;
}

//! Durable key-value substrate the session snapshot is written into.

use std::io;

pub trait KvStore {
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> io::Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

//! 编辑缓冲区模型
//!
//! 职责：
//! - 保存某个窗格当前活动文件的实时文本（Rope）
//! - 记录自上次提交到 FileStore 以来是否有未提交的修改

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;

/// 从 RopeSlice 获取字符串，优先零拷贝
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct EditBuffer {
    name: String,
    rope: Rope,
    dirty: bool,
}

impl EditBuffer {
    pub fn from_text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            rope: Rope::from_str(text),
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> Cow<'_, str> {
        slice_to_cow(self.rope.slice(..))
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replaces the whole text, as a widget reporting its full value does.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.rope == text {
            return false;
        }
        self.rope = Rope::from_str(text);
        self.dirty = true;
        true
    }

    /// Replaces chars in `start..end`; both ends are clamped to the buffer.
    pub fn replace_chars(&mut self, start: usize, end: usize, text: &str) -> bool {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        if start == end && text.is_empty() {
            return false;
        }

        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.dirty = true;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_buffer.rs"]
mod tests;

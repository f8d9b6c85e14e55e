//! Unread chat message counting.

use crate::model::ChatMessage;

/// Messages newer than `watermark`, oldest first.
///
/// The sort is stable so messages sharing a timestamp keep server order.
pub fn unread_messages(messages: &[ChatMessage], watermark: f64) -> Vec<&ChatMessage> {
    let mut sorted: Vec<&ChatMessage> = messages.iter().collect();
    sorted.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    sorted.retain(|message| message.timestamp > watermark);
    sorted
}

pub fn unread_count(messages: &[ChatMessage], watermark: f64) -> u32 {
    u32::try_from(unread_messages(messages, watermark).len()).unwrap_or(u32::MAX)
}

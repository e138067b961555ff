//! Blog post and blog comment notifications.

use std::fmt::Write;

use crate::base::types::{BlogPost, actor_or_unknown};

use super::{
    Action, comment_header, non_empty,
    text::{self, MentionPattern},
};

/// Render a blog event.
///
/// Blog texts use the narrower lowercase mention detector when truncated.
pub fn render(action: Action, post: &BlogPost, author: Option<&str>, body: Option<&str>, comment: Option<&str>) -> String {
    let author = text::title_case(actor_or_unknown(author));
    let comment = non_empty(comment);
    let author_shown = comment.is_none() || action.forces_author();

    let mut out = String::new();

    out.push_str(action.prefix());
    let _ = write!(out, "{}: {}", post.name, post.title);
    if author_shown {
        let _ = write!(out, " (by {author})");
    }
    out.push('\n');

    if let Some(body) = non_empty(body) {
        let _ = writeln!(out, "<<body>>\n{}", text::raw_block(body, MentionPattern::Lowercase));
    }

    if let Some(comment) = comment {
        out.push_str(&comment_header(author_shown, &author));
        let _ = writeln!(out, "{}", text::raw_block(comment, MentionPattern::Lowercase));
    }

    let _ = write!(out, "Blog URL: {}", post.url);

    out
}

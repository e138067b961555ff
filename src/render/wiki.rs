//! Wiki page notifications.

use std::fmt::Write;

use crate::base::types::{WikiPage, actor_or_unknown};

use super::{
    Action, comment_header, non_empty,
    text::{self, MentionPattern},
};

/// Render a wiki page event.
///
/// `changes` holds `(attribute, value)` rows listed under the edit's
/// `Changes` block; it is ignored for other actions.
pub fn render(action: Action, page: &WikiPage, author: Option<&str>, comment: Option<&str>, changes: &[(String, String)]) -> String {
    let author = text::title_case(actor_or_unknown(author));
    let comment = non_empty(comment);
    let mut author_shown = comment.is_none() || action.forces_author();

    let mut out = String::new();

    out.push_str(action.prefix());
    out.push_str(&page.name);
    if author_shown {
        let _ = write!(out, " (by {author})");
    }
    out.push('\n');

    if action == Action::Edit {
        let _ = writeln!(out, "Changes (by {author})");
        for (attribute, value) in changes {
            let _ = writeln!(out, " * {}: {}", text::title_case(attribute), value);
        }
        author_shown = true;
    }

    if let Some(comment) = comment {
        out.push_str(&comment_header(author_shown, &author));
        let _ = writeln!(out, "{}", text::raw_block(comment, MentionPattern::Alphanumeric));
    }

    let _ = write!(out, "Wiki URL: {}", page.url);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> WikiPage {
        WikiPage { name: "Guide".into(), url: "http://trac/wiki/Guide".into() }
    }

    #[test]
    fn test_wiki_edit_lists_changes() {
        let text = render(Action::Edit, &page(), Some("bob"), None, &[("version".into(), "2".into())]);

        assert_eq!(text, "Guide (by Bob)\nChanges (by Bob)\n * Version: 2\nWiki URL: http://trac/wiki/Guide");
    }

    #[test]
    fn test_wiki_edit_with_comment() {
        let text = render(Action::Edit, &page(), Some("bob"), Some("typo"), &[("version".into(), "3".into())]);

        assert_eq!(text, "Guide\nChanges (by Bob)\n * Version: 3\n<<Comment>>\ntypo\nWiki URL: http://trac/wiki/Guide");
    }

    #[test]
    fn test_wiki_added_with_comment() {
        let text = render(Action::New, &page(), Some("amy"), Some("first draft"), &[]);

        assert_eq!(text, "New Guide (by Amy)\n<<Comment>>\nfirst draft\nWiki URL: http://trac/wiki/Guide");
    }

    #[test]
    fn test_wiki_deleted() {
        let text = render(Action::Deleted, &page(), None, None, &[]);

        assert_eq!(text, "Deleted Guide (by Unknown)\nWiki URL: http://trac/wiki/Guide");
    }

    #[test]
    fn test_wiki_empty_comment_is_absent() {
        let text = render(Action::New, &page(), Some("amy"), Some(""), &[]);

        assert!(!text.contains("<<Comment"));
    }
}

//! Classification of declaration comments into title, documentation and
//! annotation lines

use serde::{Deserialize, Serialize};

use crate::annotation::MARKER;
use crate::index::{AnnotationIndex, RejectedLine};
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Title,
    Doc,
    Annotation,
}

/// One comment line attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentLine {
    pub text: String,
    pub kind: CommentKind,
    #[serde(default)]
    pub position: Position,
}

/// Classify a raw comment line written above the declaration `decl_name`
///
/// Leading `/` characters and spaces are stripped. A line starting with the
/// declaration name is its title (the name is removed), a line starting with
/// the marker is an annotation, anything else is documentation.
pub fn classify(raw: &str, decl_name: &str, position: Position) -> CommentLine {
    let text = raw.trim_start_matches('/').trim_start_matches(' ');

    if !decl_name.is_empty() && text.starts_with(decl_name) {
        return CommentLine {
            text: text.replace(&format!("{decl_name} "), ""),
            kind: CommentKind::Title,
            position,
        };
    }

    let kind = if text.starts_with(MARKER) {
        CommentKind::Annotation
    } else {
        CommentKind::Doc
    };

    CommentLine {
        text: text.to_string(),
        kind,
        position,
    }
}

/// Title, documentation and annotation index gathered from one declaration
#[derive(Debug, Clone, Default)]
pub struct DocComments {
    pub title: String,
    pub doc: String,
    pub index: AnnotationIndex,
    pub rejected: Vec<RejectedLine>,
}

impl DocComments {
    pub fn collect<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a CommentLine>,
    {
        let mut title = String::new();
        let mut doc = String::new();
        let mut annotation_lines = Vec::new();

        for line in lines {
            match line.kind {
                CommentKind::Title => title = line.text.clone(),
                CommentKind::Doc => {
                    doc.push_str(&line.text);
                    doc.push('\n');
                }
                CommentKind::Annotation => {
                    annotation_lines.push((line.text.trim(), line.position.clone()))
                }
            }
        }

        let (index, rejected) = AnnotationIndex::from_lines(annotation_lines);

        Self {
            title,
            doc,
            index,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let pos = Position::new("svc.go", 10, 1);

        let title = classify("// CreateUser creates a user", "CreateUser", pos.clone());
        assert_eq!(title.kind, CommentKind::Title);
        assert_eq!(title.text, "creates a user");

        let ann = classify("// @http-method POST", "CreateUser", pos.clone());
        assert_eq!(ann.kind, CommentKind::Annotation);
        assert_eq!(ann.text, "@http-method POST");

        let doc = classify("//Some detail", "CreateUser", pos);
        assert_eq!(doc.kind, CommentKind::Doc);
        assert_eq!(doc.text, "Some detail");
    }

    #[test]
    fn test_collect() {
        let lines = vec![
            classify("// Users handles users", "Users", Position::new("a.go", 1, 1)),
            classify("// first line", "Users", Position::new("a.go", 2, 1)),
            classify("// @http-path /users", "Users", Position::new("a.go", 3, 1)),
            classify("// second line", "Users", Position::new("a.go", 4, 1)),
        ];
        let comments = DocComments::collect(&lines);
        assert_eq!(comments.title, "handles users");
        assert_eq!(comments.doc, "first line\nsecond line\n");
        assert_eq!(comments.index.len(), 1);
        assert_eq!(comments.index.get("http-path").unwrap().position.line, 3);
        assert!(comments.rejected.is_empty());
    }

    #[test]
    fn test_collect_rejects_lines_without_marker() {
        let lines = vec![
            CommentLine {
                text: "http-path /users".into(),
                kind: CommentKind::Annotation,
                position: Position::new("a.go", 7, 3),
            },
            classify("// @http-method GET", "Users", Position::new("a.go", 8, 3)),
        ];
        let comments = DocComments::collect(&lines);

        assert_eq!(comments.index.len(), 1);
        assert!(comments.index.get("http-method").is_some());
        assert_eq!(comments.rejected.len(), 1);
        assert_eq!(comments.rejected[0].position.line, 7);
    }
}

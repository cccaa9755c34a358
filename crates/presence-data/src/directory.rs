//! User directory loading.
//!
//! The directory is a small XML document: a `<server>` element describing
//! where avatars are served from, and a `<users>` element with one child per
//! user. Unlike attendance loading there is no per-row recovery; any missing
//! piece fails the whole load.

use std::path::Path;

use presence_core::error::{PresenceError, Result};
use presence_core::models::{Directory, DirectoryEntry, UserId};
use roxmltree::{Document, Node};
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the directory XML at `path`.
pub fn load_directory(path: &Path) -> Result<Directory> {
    let text = std::fs::read_to_string(path).map_err(|source| PresenceError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let directory = parse_directory(&text)?;
    debug!("File {}: {} users", path.display(), directory.len());
    Ok(directory)
}

/// Parse a directory document held in memory.
pub fn parse_directory(text: &str) -> Result<Directory> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    let server = required_child(root, "server")?;
    let base_url = format!(
        "{}://{}:{}",
        child_text(server, "protocol")?,
        child_text(server, "host")?,
        child_text(server, "port")?,
    );

    let users = required_child(root, "users")?;
    let mut directory = Directory::new();

    for user in users.children().filter(Node::is_element) {
        let entry = parse_user(user, &base_url)?;
        directory.insert(entry.user_id, entry);
    }

    Ok(directory)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_user(user: Node<'_, '_>, base_url: &str) -> Result<DirectoryEntry> {
    let raw_id = user.attribute("id").ok_or_else(|| {
        PresenceError::XmlStructure(format!(
            "<{}> element without an id attribute",
            user.tag_name().name()
        ))
    })?;
    let user_id: UserId = raw_id
        .trim()
        .parse()
        .map_err(|_| PresenceError::InvalidUserId(raw_id.to_string()))?;

    Ok(DirectoryEntry {
        user_id,
        name: child_text(user, "name")?.to_string(),
        avatar: format!("{}{}", base_url, child_text(user, "avatar")?),
    })
}

/// First direct child element named `name`.
fn required_child<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.has_tag_name(name))
        .ok_or_else(|| {
            PresenceError::XmlStructure(format!(
                "missing <{}> in <{}>",
                name,
                parent.tag_name().name()
            ))
        })
}

/// Text content of the child element `name`; empty when the element is empty.
fn child_text<'a>(parent: Node<'a, '_>, name: &str) -> Result<&'a str> {
    Ok(required_child(parent, name)?.text().unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

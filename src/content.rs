//! Portfolio content served by the virtual filesystem.

use crate::vfs::{Vfs, VfsBuilder, VfsError};

pub const ABOUT_FILE: &str = "about.txt";
pub const SKILLS_FILE: &str = "skills.json";
pub const PROJECTS_DIR: &str = "projects";

const ABOUT: &str = "\
Owen O'Farrell
Software engineer. Builds backends, tooling, and the occasional terminal
that pretends to be a computer.

Currently interested in systems programming, developer experience, and
making slow things fast.";

const SKILLS: &str = r#"{
  "languages": ["Rust", "TypeScript", "Python", "Go", "SQL"],
  "backend": ["PostgreSQL", "Redis", "gRPC", "REST"],
  "frontend": ["React", "HTML/CSS", "Web Audio"],
  "tooling": ["Git", "Docker", "Linux", "CI/CD"]
}"#;

const CONTACT: &str = "\
Run `contact` to send a message from this terminal.
Fields: name, email, message. Everything is sent once, as typed.";

const PROJECT_TERMINAL: &str = "\
ofo-shell
---------
This terminal. A read-only virtual filesystem, a command registry,
animated boot output, and a guided contact form that submits as JSON.";

const PROJECT_RELAY: &str = "\
mail-relay
----------
Serverless endpoint that accepts {name, email, message} and relays it
as an email. 405 on non-POST, 400 on missing fields, 500 on relay failure.";

const PROJECT_TRACKER: &str = "\
habit-tracker
-------------
Offline-first habit tracker with conflict-free sync between devices.";

const NOTES_TODO: &str = "\
- finish the matrix effect
- write more notes";

/// Builds the default portfolio tree.
pub fn portfolio() -> Result<Vfs, VfsError> {
    VfsBuilder::new()
        .file(ABOUT_FILE, ABOUT)
        .file(SKILLS_FILE, SKILLS)
        .file("contact.txt", CONTACT)
        .dir(PROJECTS_DIR, |projects| {
            projects
                .file("ofo-shell.txt", PROJECT_TERMINAL)
                .file("mail-relay.txt", PROJECT_RELAY)
                .file("habit-tracker.txt", PROJECT_TRACKER)
        })
        .dir("notes", |notes| notes.file("todo.txt", NOTES_TODO))
        .build()
}

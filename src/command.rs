//! Parser for the colon-delimited chat commands.
//!
//! Two command forms bypass the completion call and talk directly to the
//! store: `/salvar <category>:<key>:<value>` and `/recuperar <category>:<key>`.
//! Anything else (including malformed command attempts) is a plain message.

/// A parsed inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/salvar categoria:chave:valor` — upsert a knowledge fact.
    SaveKnowledge {
        category: String,
        key: String,
        value: String,
    },
    /// `/recuperar categoria:chave` — exact knowledge lookup.
    RetrieveKnowledge { category: String, key: String },
    /// Anything else goes to the completion provider.
    Plain(String),
}

impl Command {
    /// Parse a raw message by splitting on `:`.
    ///
    /// The value of a save command may itself contain `:`; everything after
    /// the second separator is rejoined verbatim. A command prefix with too
    /// few parts falls through to [`Command::Plain`].
    pub fn parse(raw: &str) -> Command {
        if raw.starts_with("/salvar") {
            let parts: Vec<&str> = raw.split(':').collect();
            if parts.len() >= 3 {
                let category = parts[0].trim_start_matches("/salvar").trim().to_string();
                let key = parts[1].trim().to_string();
                let value = parts[2..].join(":").trim().to_string();
                return Command::SaveKnowledge {
                    category,
                    key,
                    value,
                };
            }
        }

        if raw.starts_with("/recuperar") {
            let parts: Vec<&str> = raw.split(':').collect();
            if parts.len() == 2 {
                let category = parts[0].trim_start_matches("/recuperar").trim().to_string();
                let key = parts[1].trim().to_string();
                return Command::RetrieveKnowledge { category, key };
            }
        }

        Command::Plain(raw.to_string())
    }
}

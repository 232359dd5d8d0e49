//! # CLI Session Context
//!
//! Loads the register from a JSON state file, provides the caller and
//! document parsing shared by the subcommands, and writes the state file
//! back after a successful mutation. The state file carries both the
//! register tables and the mirrored ledger entries, so `Synced` outbox
//! statuses persisted by one invocation are backed by ledger state the
//! next invocation can still see.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use folio_core::{Caller, ContentDigest, Identity, RequestId};
use folio_ledger::{MemoryLedger, Synchronizer};
use folio_state::{DocumentEntry, DocumentKind, DocumentRef};
use folio_store::{DomainEvent, LandStore, Tables};

/// On-disk layout of the state file: the register tables plus every
/// ledger entry mirrored so far, keyed by natural key.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    tables: Tables,
    #[serde(default)]
    ledger: BTreeMap<String, DomainEvent>,
}

/// An open state file.
pub struct Session {
    path: PathBuf,
    /// The loaded store.
    pub store: LandStore,
    /// Synchronizer over the ledger mirror loaded from the state file.
    pub sync: Synchronizer<MemoryLedger>,
}

impl Session {
    /// Load the state file, or start empty when it does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let state = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading state file {}", path.display()))?;
            serde_json::from_str::<StateFile>(&raw)
                .with_context(|| format!("parsing state file {}", path.display()))?
        } else {
            StateFile {
                tables: Tables::default(),
                ledger: BTreeMap::new(),
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            store: LandStore::from_tables(state.tables),
            sync: Synchronizer::new(MemoryLedger::with_entries(state.ledger)),
        })
    }

    /// Write the current tables and ledger mirror back to the state file.
    pub fn save(&self) -> Result<()> {
        let state = StateFile {
            tables: self.store.snapshot(),
            ledger: self.sync.client().entries(),
        };
        let raw = serde_json::to_string_pretty(&state).context("serializing register state")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing state file {}", self.path.display()))?;
        Ok(())
    }
}

/// Who is invoking the command, and with which roles.
#[derive(Args, Debug)]
pub struct CallerArgs {
    /// Caller identity (0x-prefixed address).
    #[arg(long)]
    pub caller: String,

    /// Invoke with the administrator role.
    #[arg(long)]
    pub admin: bool,

    /// Invoke with the agent role.
    #[arg(long)]
    pub agent: bool,
}

impl CallerArgs {
    /// Build the caller context.
    pub fn resolve(&self) -> Result<Caller> {
        let identity = Identity::parse(&self.caller)?;
        let mut caller = Caller::user(identity);
        if self.admin {
            caller.roles.insert(folio_core::Role::Admin);
        }
        if self.agent {
            caller.roles.insert(folio_core::Role::Agent);
        }
        Ok(caller)
    }
}

/// Parse `--document kind:path` specs into a manifest, hashing each
/// file's contents for its digest.
pub fn document_ref(specs: &[String]) -> Result<DocumentRef> {
    let mut manifest = Vec::with_capacity(specs.len());
    for spec in specs {
        let (kind, path) = spec
            .split_once(':')
            .with_context(|| format!("document spec {spec:?} must be kind:path"))?;
        let kind = parse_kind(kind)?;
        let path = PathBuf::from(path);
        let bytes =
            std::fs::read(&path).with_context(|| format!("reading document {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        manifest.push(DocumentEntry {
            name,
            kind,
            digest: ContentDigest::from_bytes(&bytes),
        });
    }
    Ok(DocumentRef::new(manifest)?)
}

fn parse_kind(s: &str) -> Result<DocumentKind> {
    Ok(match s {
        "deed" => DocumentKind::Deed,
        "survey" => DocumentKind::Survey,
        "supporting" => DocumentKind::Supporting,
        "transfer_agreement" => DocumentKind::TransferAgreement,
        "owner_consent" => DocumentKind::OwnerConsent,
        "legal_attachment" => DocumentKind::LegalAttachment,
        other => bail!(
            "unknown document kind {other:?} (expected deed, survey, supporting, \
             transfer_agreement, owner_consent, or legal_attachment)"
        ),
    })
}

/// Parse a request UUID, with or without the `request:` prefix the stack
/// uses when displaying ids.
pub fn parse_request_id(s: &str) -> Result<RequestId> {
    let raw = s.strip_prefix("request:").unwrap_or(s);
    let uuid = raw
        .parse()
        .with_context(|| format!("invalid request id {s:?}"))?;
    Ok(RequestId(uuid))
}

/// Print any serializable value as pretty JSON.
pub fn emit<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_roles() {
        let args = CallerArgs {
            caller: "0x0000000000000000000000000000000000000001".to_string(),
            admin: true,
            agent: false,
        };
        let caller = args.resolve().unwrap();
        assert!(caller.is_admin());
        assert!(!caller.is_agent());
    }

    #[test]
    fn test_bad_identity_rejected() {
        let args = CallerArgs {
            caller: "not-an-address".to_string(),
            admin: false,
            agent: false,
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        assert!(parse_kind("deed").is_ok());
        assert!(parse_kind("photograph").is_err());
    }

    #[test]
    fn test_state_file_roundtrips_ledger_mirror() {
        let path = std::env::temp_dir()
            .join(format!("folio-session-{}.json", RequestId::new().as_uuid()));

        let event = DomainEvent::ParcelRegistered {
            folio: folio_core::FolioNumber::parse("NSW-SYD-2024-001").unwrap(),
            owner: Identity::parse("0x0000000000000000000000000000000000000001").unwrap(),
        };
        let key = event.natural_key();

        let session = Session::open(&path).unwrap();
        session
            .store
            .transaction(|tables| {
                tables.append_event(event.clone());
                Ok(())
            })
            .unwrap();
        assert!(session.sync.drain(&session.store).is_clean());
        session.save().unwrap();

        // A later invocation sees the mirrored entry, not just the
        // Synced status markers.
        let reopened = Session::open(&path).unwrap();
        assert!(reopened.sync.client().contains(&key));
        assert!(reopened.store.read(|t| t.pending_outbox().is_empty()));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_request_id_prefix_optional() {
        let id = RequestId::new();
        assert_eq!(parse_request_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_request_id(&id.as_uuid().to_string()).unwrap(), id);
        assert!(parse_request_id("nonsense").is_err());
    }
}

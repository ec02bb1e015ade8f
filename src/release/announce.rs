//! Release announcement draft
//!
//! Renders the announcement message into a plain-text file the operator
//! later sends with `git send-email`. Headers first, then a fixed
//! promotional body, then the changelog sections in fixed order, then the
//! signature. Closing consumes the writer, so nothing can append to a
//! finalized draft.

use crate::core::config::AnnounceConfig;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::release::changelog::SECTIONS;
use chrono::{Local, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct Announcement {
  writer: BufWriter<File>,
  path: PathBuf,
  version: String,
}

impl Announcement {
  pub fn create(path: PathBuf, version: String) -> ReleaseResult<Self> {
    let file = File::create(&path)
      .with_context(|| format!("Failed to create announcement file {}", path.display()))?;
    Ok(Self {
      writer: BufWriter::new(file),
      path,
      version,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Write the five fixed headers and the promotional body
  ///
  /// The version string is interpolated unescaped into URLs and the pip
  /// recipe; the caller supplies a value safe for a path segment.
  pub fn set_headers(&mut self, message_id: &str, date: &str, config: &AnnounceConfig) -> ReleaseResult<()> {
    writeln!(self.writer, "Message-Id: {}", message_id)?;
    writeln!(self.writer, "Date: {}", date)?;
    writeln!(self.writer, "From: {}", config.from)?;
    writeln!(self.writer, "To: {}", config.mailing_list)?;
    writeln!(self.writer, "Subject: [ANNOUNCE] OfflineIMAP v{} released", self.version)?;
    writeln!(self.writer)?;

    write!(
      self.writer,
      "\nOfflineIMAP v{version} is out.\n\
       \n\
       Downloads:\n\
       \x20 http://github.com/OfflineIMAP/offlineimap/archive/v{version}.tar.gz\n\
       \x20 http://github.com/OfflineIMAP/offlineimap/archive/v{version}.zip\n\
       \n\
       Pip:\n\
       \x20 wget \"https://raw.githubusercontent.com/OfflineIMAP/offlineimap/v{version}/requirements.txt\" -O requirements.txt\n\
       \x20 pip install -r ./requirements.txt --user git+https://github.com/OfflineIMAP/offlineimap.git@v{version}\n\
       \n",
      version = self.version
    )?;
    Ok(())
  }

  /// Write the changelog sections in fixed order, then the signature
  ///
  /// The `Notes` section opens the body without a header line; every other
  /// present section is introduced by `# <Section>`.
  pub fn set_content(&mut self, sections: &HashMap<String, String>, signature: &str) -> ReleaseResult<()> {
    writeln!(self.writer)?;
    for section in SECTIONS {
      if let Some(text) = sections.get(section) {
        if section != "Notes" {
          writeln!(self.writer, "# {}", section)?;
        }
        write!(self.writer, "{}", text)?;
        writeln!(self.writer)?;
      }
    }
    writeln!(self.writer, "-- ")?;
    writeln!(self.writer, "{}", signature)?;
    Ok(())
  }

  /// Flush and finalize the draft
  pub fn close(mut self) -> ReleaseResult<()> {
    self.writer.flush()?;
    Ok(())
  }
}

/// Generate a message-id of the form `<{timestamp}.{hash}@{domain}>`
pub fn make_message_id(domain: &str, version: &str) -> String {
  let timestamp = Utc::now().timestamp();
  let mut hasher = Sha256::new();
  hasher.update(timestamp.to_be_bytes());
  hasher.update(version.as_bytes());
  hasher.update(std::process::id().to_be_bytes());
  let digest = hasher.finalize();
  let entropy: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
  format!("<{}.{}@{}>", timestamp, entropy, domain)
}

/// Current local time as an RFC 2822 date header value
pub fn rfc2822_date() -> String {
  Local::now().to_rfc2822()
}

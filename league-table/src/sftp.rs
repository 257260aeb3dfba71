//! # SFTP session for remote sync
//!
//! Implements [`RemoteSession`] from `league-table-core` over `ssh2`
//! (libssh2). Password authentication only; the server host key is accepted
//! without a known-hosts check.
//!
//! The session is blocking. Async callers run it on
//! `tokio::task::spawn_blocking`.

use std::fs::{self, File};
use std::io;
use std::net::TcpStream;
use std::path::Path;

use league_table_core::contract::RemoteSession;
use league_table_core::remote::{RemoteEntry, RemoteError, RemoteTarget};
use ssh2::{Session, Sftp};
use tracing::{debug, error, info};

struct Connection {
    session: Session,
    sftp: Sftp,
    host: String,
    user: String,
}

/// A lazily connected SFTP session.
#[derive(Default)]
pub struct SftpSession {
    conn: Option<Connection>,
}

impl SftpSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection, RemoteError> {
        self.conn.as_ref().ok_or(RemoteError::NotConnected)
    }
}

fn open_session(target: &RemoteTarget) -> Result<Connection, RemoteError> {
    let connect_err = |message: String| {
        error!(host = %target.host, port = target.port, message = %message, "SFTP connect failed");
        RemoteError::Connect {
            host: target.host.clone(),
            message,
        }
    };

    let tcp = TcpStream::connect((target.host.as_str(), target.port))
        .map_err(|e| connect_err(e.to_string()))?;
    let mut session = Session::new().map_err(|e| connect_err(e.to_string()))?;
    session.set_tcp_stream(tcp);
    session.handshake().map_err(|e| connect_err(e.to_string()))?;

    session
        .userauth_password(&target.username, &target.password)
        .map_err(|e| {
            error!(host = %target.host, user = %target.username, error = %e, "SFTP authentication failed");
            RemoteError::Auth {
                host: target.host.clone(),
                user: target.username.clone(),
                message: e.to_string(),
            }
        })?;

    let sftp = session.sftp().map_err(|e| connect_err(e.to_string()))?;
    Ok(Connection {
        session,
        sftp,
        host: target.host.clone(),
        user: target.username.clone(),
    })
}

impl RemoteSession for SftpSession {
    fn connect(&mut self, target: &RemoteTarget) -> Result<(), RemoteError> {
        if self.conn.is_some() {
            debug!(host = %target.host, "Replacing existing SFTP connection");
            self.disconnect()?;
        }
        let conn = open_session(target)?;
        info!(host = %conn.host, user = %conn.user, "SFTP session established");
        self.conn = Some(conn);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), RemoteError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        let Connection { session, sftp, host, .. } = conn;
        drop(sftp);
        session
            .disconnect(None, "league-table sync finished", None)
            .map_err(|e| RemoteError::Disconnect {
                host: host.clone(),
                message: e.to_string(),
            })?;
        debug!(host = %host, "SFTP session closed");
        Ok(())
    }

    fn list(&mut self, path: &Path) -> Result<Vec<RemoteEntry>, RemoteError> {
        let conn = self.conn()?;
        let listing = conn.sftp.readdir(path).map_err(|e| RemoteError::List {
            host: conn.host.clone(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(listing
            .into_iter()
            .map(|(entry_path, stat)| RemoteEntry {
                filename: entry_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry_path.to_string_lossy().into_owned()),
                size: stat.size,
                mode: stat.perm,
                atime: stat.atime,
                mtime: stat.mtime,
            })
            .collect())
    }

    fn upload(&mut self, local: &Path, remote: &Path) -> Result<(), RemoteError> {
        let conn = self.conn()?;
        let upload_err = |message: String| RemoteError::Upload {
            host: conn.host.clone(),
            local: local.to_path_buf(),
            remote: remote.to_path_buf(),
            message,
        };
        info!(
            host = %conn.host,
            user = %conn.user,
            local = %local.display(),
            remote = %remote.display(),
            "uploading"
        );
        let mut source = File::open(local).map_err(|e| upload_err(e.to_string()))?;
        let mut target = conn
            .sftp
            .create(remote)
            .map_err(|e| upload_err(e.to_string()))?;
        let bytes = io::copy(&mut source, &mut target).map_err(|e| upload_err(e.to_string()))?;
        info!(remote = %remote.display(), bytes, "upload completed");
        Ok(())
    }

    fn download(&mut self, remote: &Path, local: &Path) -> Result<(), RemoteError> {
        let conn = self.conn()?;
        let download_err = |message: String| RemoteError::Download {
            host: conn.host.clone(),
            remote: remote.to_path_buf(),
            local: local.to_path_buf(),
            message,
        };
        info!(
            host = %conn.host,
            user = %conn.user,
            remote = %remote.display(),
            local = %local.display(),
            "downloading"
        );
        if let Some(parent) = local.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|e| download_err(e.to_string()))?;
            }
        }
        let mut source = conn
            .sftp
            .open(remote)
            .map_err(|e| download_err(e.to_string()))?;
        let mut target = File::create(local).map_err(|e| download_err(e.to_string()))?;
        let bytes = io::copy(&mut source, &mut target).map_err(|e| download_err(e.to_string()))?;
        info!(local = %local.display(), bytes, "download completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_need_a_connection() {
        let mut session = SftpSession::new();
        assert!(!session.is_connected());
        assert!(matches!(
            session.list(Path::new("/")),
            Err(RemoteError::NotConnected)
        ));
        assert!(matches!(
            session.upload(Path::new("a"), Path::new("/a")),
            Err(RemoteError::NotConnected)
        ));
        assert!(session.disconnect().is_ok(), "disconnect is idempotent");
    }

    #[test]
    fn connect_to_closed_port_is_a_connect_error() {
        let target = RemoteTarget {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "u".to_string(),
            password: "p".to_string(),
        };
        let mut session = SftpSession::new();
        let err = session.connect(&target).unwrap_err();
        assert!(matches!(err, RemoteError::Connect { .. }), "got {err:?}");
        assert!(!session.is_connected());
    }
}

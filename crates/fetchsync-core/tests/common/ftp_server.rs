//! Minimal anonymous FTP server for integration tests.
//!
//! Answers the commands libcurl sends for a probe (USER, PASS, PWD, CWD, MDTM,
//! TYPE, SIZE, REST) and for a download (EPSV/PASV + RETR). Every path maps
//! to the same file. Commands are recorded and RETRs counted.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct File {
    pub body: Vec<u8>,
    /// `YYYYMMDDhhmmss`; None makes MDTM answer 502.
    pub mdtm: Option<String>,
}

pub struct FtpServer {
    base: String,
    file: Arc<Mutex<File>>,
    retrs: Arc<AtomicUsize>,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FtpServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn retrs(&self) -> usize {
        self.retrs.load(Ordering::SeqCst)
    }

    /// Command verbs received so far, upper-cased with their argument (e.g. `TYPE I`).
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn set(&self, file: File) {
        *self.file.lock().unwrap() = file;
    }
}

pub fn start(file: File) -> FtpServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let server = FtpServer {
        base: format!("ftp://127.0.0.1:{}/", port),
        file: Arc::new(Mutex::new(file)),
        retrs: Arc::new(AtomicUsize::new(0)),
        commands: Arc::new(Mutex::new(Vec::new())),
    };
    let file = Arc::clone(&server.file);
    let retrs = Arc::clone(&server.retrs);
    let commands = Arc::clone(&server.commands);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let file = Arc::clone(&file);
            let retrs = Arc::clone(&retrs);
            let commands = Arc::clone(&commands);
            thread::spawn(move || {
                let _ = session(stream, &file, &retrs, &commands);
            });
        }
    });
    server
}

fn reply(out: &mut TcpStream, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")
}

fn session(
    stream: TcpStream,
    file: &Mutex<File>,
    retrs: &AtomicUsize,
    commands: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    let mut out = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut passive: Option<TcpListener> = None;

    reply(&mut out, "220 fetchsync test server")?;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end();
        let (verb, arg) = match line.split_once(' ') {
            Some((v, a)) => (v.to_ascii_uppercase(), a.to_string()),
            None => (line.to_ascii_uppercase(), String::new()),
        };
        commands
            .lock()
            .unwrap()
            .push(format!("{} {}", verb, arg).trim_end().to_string());

        let current = file.lock().unwrap().clone();
        match verb.as_str() {
            "USER" => reply(&mut out, "331 Anonymous login ok, send password")?,
            "PASS" => reply(&mut out, "230 Logged in")?,
            "PWD" => reply(&mut out, "257 \"/\" is the current directory")?,
            "CWD" => reply(&mut out, "250 Directory changed")?,
            "TYPE" => reply(&mut out, &format!("200 Type set to {}", arg))?,
            "SIZE" => reply(&mut out, &format!("213 {}", current.body.len()))?,
            "MDTM" => match &current.mdtm {
                Some(ts) => reply(&mut out, &format!("213 {}", ts))?,
                None => reply(&mut out, "502 Command not implemented")?,
            },
            "REST" => reply(&mut out, &format!("350 Restarting at {}", arg))?,
            "EPSV" => {
                let l = TcpListener::bind("127.0.0.1:0")?;
                let port = l.local_addr()?.port();
                passive = Some(l);
                reply(
                    &mut out,
                    &format!("229 Entering Extended Passive Mode (|||{}|)", port),
                )?;
            }
            "PASV" => {
                let l = TcpListener::bind("127.0.0.1:0")?;
                let port = l.local_addr()?.port();
                passive = Some(l);
                reply(
                    &mut out,
                    &format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port / 256,
                        port % 256
                    ),
                )?;
            }
            "RETR" => match passive.take() {
                Some(l) => {
                    retrs.fetch_add(1, Ordering::SeqCst);
                    reply(&mut out, "150 Opening BINARY mode data connection")?;
                    let (mut data, _) = l.accept()?;
                    data.write_all(&current.body)?;
                    drop(data);
                    reply(&mut out, "226 Transfer complete")?;
                }
                None => reply(&mut out, "425 Use PASV or EPSV first")?,
            },
            "QUIT" => {
                reply(&mut out, "221 Bye")?;
                return Ok(());
            }
            _ => reply(&mut out, "502 Command not implemented")?,
        }
    }
}

use assert_cmd::prelude::*;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread;
use tempfile::tempdir;

/// Serve `count` connections, answering each by request path.
fn serve_gallery(count: usize) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..count {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let body = match path.as_str() {
                "/dynamic/stat/num-pages" => "9".to_string(),
                "/dynamic/stat/num-pics" => "200".to_string(),
                "/dynamic/pg2" => r#"<ul><li><a href="/dynamic/zoom/24"><img src="/piclib/thumb1/2020/lake.jpg"></a><span class="caption">2020-08-14</span></li></ul>"#.to_string(),
                _ => String::new(),
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            seen.push(path);
        }
        seen
    });
    (base, server)
}

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::cargo_bin("picnav").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("--dump"))
        .stdout(predicates::str::contains("--server"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("picnav").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("picnav"));
}

#[test]
fn test_dump_page() {
    let config_home = tempdir().unwrap();
    let (base, server) = serve_gallery(3);

    let mut cmd = Command::cargo_bin("picnav").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .args(["--server", &base, "--dump", "2"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Page 2 of 9 (200 photos)"))
        .stdout(predicates::str::contains("24\t2020-08-14\t2020/lake.jpg"));

    let seen = server.join().unwrap();
    assert_eq!(
        seen,
        vec!["/dynamic/stat/num-pages", "/dynamic/stat/num-pics", "/dynamic/pg2"]
    );
    assert!(config_home.path().join("picnav").join("configuration.json").exists());
}

#[test]
fn test_dump_unreachable_server_fails() {
    let config_home = tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut cmd = Command::cargo_bin("picnav").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .args(["--server", &base, "--dump", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("/dynamic/stat/num-pages"));
}

#[test]
fn test_invalid_zoom_location_is_rejected() {
    let config_home = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("picnav").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .args(["--zoom", "/dynamic/zoom/abc"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("not a zoom location"));
}

//! Drives the `acad` binary end to end through temp directories.

use std::path::Path;
use std::process::{Command, Output};

fn acad(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_acad"))
        .current_dir(dir)
        .env_remove("ACAD_SIGNING_KEY")
        .args(args)
        .output()
        .expect("spawn acad")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn keygen(dir: &Path, prefix: &str) -> serde_json::Value {
    let out = acad(dir, &["keygen", "--prefix", prefix]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    stdout_json(&out)
}

#[test]
fn issue_verify_and_tamper() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    let identity = keygen(p, "registrar");
    assert!(identity["did"].as_str().unwrap().starts_with("did:key:z"));
    std::fs::write(p.join("claims.json"), r#"{"degree": "BSc Physics"}"#).unwrap();

    let out = acad(
        p,
        &[
            "issue",
            "--key",
            "registrar.key",
            "--subject",
            "did:key:zStudent",
            "--claims",
            "claims.json",
            "--type",
            "DegreeCredential",
            "--out",
            "vc.json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out = acad(p, &["verify", "vc.json", "--offline"]);
    assert_eq!(out.status.code(), Some(0));
    let result = stdout_json(&out);
    assert_eq!(result["isValid"], true);
    assert_eq!(result["holder"], "did:key:zStudent");

    let mut vc: serde_json::Value =
        serde_json::from_slice(&std::fs::read(p.join("vc.json")).unwrap()).unwrap();
    vc["credentialSubject"]["degree"] = "PhD Physics".into();
    std::fs::write(p.join("forged.json"), vc.to_string()).unwrap();

    let out = acad(p, &["verify", "forged.json", "--offline"]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(stdout_json(&out)["error"], "invalid signature");
}

#[test]
fn status_list_maintenance() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();

    let out = acad(p, &["status", "create", "--length", "1024", "--out", "list.json"]);
    assert!(out.status.success());

    let out = acad(p, &["status", "set", "list.json", "42"]);
    assert!(out.status.success());
    let out = acad(p, &["status", "get", "list.json", "42"]);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "true");
    let out = acad(p, &["status", "get", "list.json", "41"]);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "false");

    let out = acad(p, &["status", "set", "list.json", "42", "--clear"]);
    assert!(out.status.success());
    let out = acad(p, &["status", "get", "list.json", "42"]);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "false");

    let out = acad(p, &["status", "get", "list.json", "1024"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn revoked_credential_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    let list_url = "https://uni.example/status/1";
    keygen(p, "registrar");

    let out = acad(
        p,
        &[
            "issue",
            "--key",
            "registrar.key",
            "--subject",
            "did:key:zStudent",
            "--status-list",
            list_url,
            "--status-index",
            "7",
            "--out",
            "vc.json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    assert!(acad(p, &["status", "create", "--length", "64", "--out", "list.json"])
        .status
        .success());
    let publish = |p: &Path| {
        let out = acad(
            p,
            &[
                "status",
                "credential",
                "list.json",
                "--url",
                list_url,
                "--key",
                "registrar.key",
                "--out",
                "list-vc.json",
            ],
        );
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    };

    publish(p);
    let verify = [
        "verify",
        "vc.json",
        "--status",
        "--document",
        "list-vc.json",
        "--offline",
    ];
    let out = acad(p, &verify);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout_json(&out)["isRevoked"], false);

    assert!(acad(p, &["status", "set", "list.json", "7"]).status.success());
    publish(p);
    let out = acad(p, &verify);
    assert_eq!(out.status.code(), Some(3));
    let result = stdout_json(&out);
    assert_eq!(result["isValid"], true);
    assert_eq!(result["isRevoked"], true);
}

#[test]
fn unreachable_status_list_fails_closed() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    keygen(p, "registrar");
    let out = acad(
        p,
        &[
            "issue",
            "--key",
            "registrar.key",
            "--subject",
            "did:key:zStudent",
            "--status-list",
            "https://uni.example/status/9",
            "--status-index",
            "1",
            "--out",
            "vc.json",
        ],
    );
    assert!(out.status.success());

    let out = acad(p, &["verify", "vc.json", "--status", "--offline"]);
    assert_eq!(out.status.code(), Some(2));
    let error = stdout_json(&out)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("revocation check failed"), "{error}");
}

#[test]
fn present_and_verify_presentation() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    keygen(p, "registrar");
    let holder = keygen(p, "student");
    let holder_did = holder["did"].as_str().unwrap();

    assert!(acad(
        p,
        &[
            "issue",
            "--key",
            "registrar.key",
            "--subject",
            holder_did,
            "--out",
            "vc.json",
        ],
    )
    .status
    .success());

    let out = acad(
        p,
        &[
            "present",
            "vc.json",
            "--key",
            "student.key",
            "--challenge",
            "nonce-1",
            "--domain",
            "employer.example",
            "--out",
            "vp.json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let ok = acad(
        p,
        &[
            "verify-presentation",
            "vp.json",
            "--challenge",
            "nonce-1",
            "--domain",
            "employer.example",
            "--offline",
        ],
    );
    assert_eq!(ok.status.code(), Some(0));
    assert_eq!(stdout_json(&ok)["holder"], holder_did);

    let replay = acad(
        p,
        &[
            "verify-presentation",
            "vp.json",
            "--challenge",
            "nonce-2",
            "--domain",
            "employer.example",
            "--offline",
        ],
    );
    assert_eq!(replay.status.code(), Some(2));
    assert_eq!(stdout_json(&replay)["error"], "challenge mismatch");
}

#[test]
fn hash_is_key_order_independent() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    std::fs::write(p.join("a.json"), r#"{"b":1,"a":2}"#).unwrap();
    std::fs::write(p.join("b.json"), r#"{ "a": 2, "b": 1 }"#).unwrap();
    let a = acad(p, &["hash", "a.json"]);
    let b = acad(p, &["hash", "b.json"]);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);

    let canon = acad(p, &["canonicalize", "b.json"]);
    assert_eq!(String::from_utf8_lossy(&canon.stdout).trim(), r#"{"a":2,"b":1}"#);
}

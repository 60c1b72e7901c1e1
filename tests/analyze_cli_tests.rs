mod common;

use common::TestEnv;

#[test]
fn analyze_requires_a_transcript_table() {
    let env = TestEnv::new();
    let output = env.run(&["analyze"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Run 'callsight transcribe' first"),
        "expected missing transcript table error, got:\n{}",
        stderr
    );
}

#[test]
fn analyze_requires_an_api_key() {
    let env = TestEnv::new();
    env.write_transcripts(&["Hi, I'm Jane, thanks for calling."]);

    let output = env.run(&["analyze"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("OpenAI API key is missing"),
        "expected missing API key error, got:\n{}",
        stderr
    );
}

#[test]
fn topics_requires_an_analyzed_report() {
    let env = TestEnv::new();
    let output = env.run(&["topics"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Run 'callsight analyze' first"),
        "expected missing report error, got:\n{}",
        stderr
    );
}

#[test]
fn transcribe_requires_an_api_key_when_files_exist() {
    let env = TestEnv::new();
    let audio_dir = tempfile::tempdir().unwrap();
    std::fs::write(audio_dir.path().join("call.mp3"), b"fake audio").unwrap();

    let output = env.run(&[
        "transcribe",
        "--input",
        audio_dir.path().to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("OpenAI API key is missing"),
        "expected missing API key error, got:\n{}",
        stderr
    );
}

//! End-to-end sessions against the in-memory backend.

use vosh_core::{MemoryGateway, Navigation, Shell};

fn session(gateway: MemoryGateway) -> Shell<MemoryGateway> {
    Shell::new(gateway, |_: &str| true).with_user("alice")
}

fn tail(shell: &Shell<MemoryGateway>, n: usize) -> Vec<String> {
    let lines = shell.transcript().lines();
    lines[lines.len().saturating_sub(n)..].to_vec()
}

#[tokio::test]
async fn test_write_then_process_text() {
    let mut shell = session(MemoryGateway::new("alice"));
    shell.start().await;

    shell.submit("mkdir notes").await;
    shell.submit("cd notes").await;
    shell.submit("cat > todo.txt").await;
    shell.submit("buy milk").await;
    shell.submit("cat >> todo.txt").await;
    shell.submit("Call Bob today").await;

    shell.submit("cat todo.txt").await;
    assert_eq!(tail(&shell, 2), vec!["buy milk", "Call Bob today"]);

    shell.submit("grep -in \"call\" todo.txt").await;
    assert_eq!(tail(&shell, 1), vec!["2:Call Bob today"]);

    shell.submit("sed \"s/milk/bread/\" todo.txt").await;
    assert_eq!(tail(&shell, 2), vec!["buy bread", "Call Bob today"]);

    shell.submit("awk '/Bob/ {print $3}' todo.txt").await;
    assert_eq!(tail(&shell, 1), vec!["today"]);

    shell.submit("pwd").await;
    assert_eq!(tail(&shell, 1), vec!["~/notes"]);

    shell.submit("df").await;
    assert_eq!(tail(&shell, 1), vec!["Disk usage: 23 / 10000 bytes"]);
}

#[tokio::test]
async fn test_transcript_echoes_each_submission() {
    let mut shell = session(MemoryGateway::new("alice"));
    shell.start().await;

    shell.submit("touch a").await;
    shell.submit("").await;
    shell.submit("cat > a").await;
    shell.submit("  hi  ").await;
    shell.submit("ls -al").await;

    let lines = shell.transcript().lines();
    assert_eq!(lines[0], "Welcome to Virtual OS!");
    assert_eq!(lines[1], "~> touch a");
    assert_eq!(lines[2], "~>");
    assert_eq!(lines[3], "~> cat > a");
    assert_eq!(lines[4], "Enter content for a and press Enter:");
    assert_eq!(lines[5], "... hi");
    assert_eq!(lines[6], "~> ls -al");
    assert!(lines[7].starts_with("rwx------ alice 1\t"));
    assert!(lines[7].ends_with("\ta"));
}

#[tokio::test]
async fn test_processes_and_navigation() {
    let gateway = MemoryGateway::new("alice");
    let prog = gateway.seed_file(None, "worker", "loop");
    let mut shell = session(gateway);
    shell.start().await;

    shell.submit("exec worker").await;
    shell.submit("exec worker").await;
    shell.submit("pkill worker").await;
    assert_eq!(tail(&shell, 1), vec!["Killed 2 process(es)"]);
    shell.submit("ps").await;
    assert_eq!(tail(&shell, 1), vec!["No processes."]);

    assert_eq!(shell.submit("edit worker").await, Some(Navigation::Editor(prog)));
    assert_eq!(shell.submit("edit nothing").await, None);
    assert_eq!(tail(&shell, 1), vec!["edit: nothing: No such file"]);
}

#[tokio::test]
async fn test_declined_delete_keeps_entry() {
    let gateway = MemoryGateway::new("alice");
    let id = gateway.seed_file(None, "keep", "");
    let mut shell = Shell::new(gateway, |_: &str| false);
    shell.start().await;

    shell.submit("rm keep").await;
    assert_eq!(tail(&shell, 1), vec!["~> rm keep"]);
    assert!(shell.gateway().entry(id).is_some());
    assert_eq!(shell.transcript().len(), 2);
}

#[tokio::test]
async fn test_backend_outage_is_not_fatal() {
    let gateway = MemoryGateway::new("alice");
    gateway.seed_file(None, "f", "x");
    let mut shell = session(gateway);
    shell.start().await;

    shell.gateway().set_offline(true);
    shell.submit("cat f").await;
    assert_eq!(tail(&shell, 1), vec!["Error: Could not read file."]);
    shell.submit("ls").await;
    assert_eq!(tail(&shell, 1), vec!["Error: Could not fetch files."]);

    shell.gateway().set_offline(false);
    shell.submit("ls").await;
    assert_eq!(tail(&shell, 1), vec!["f"]);
}

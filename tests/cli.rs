#[cfg(test)]
mod cli_tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process::{Command, Output};

    fn write_source(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rox-{}-{}", std::process::id(), name));
        fs::write(&path, bytes).expect("write source file");
        path
    }

    fn rox(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_rox"))
            .args(args)
            .output()
            .expect("run rox binary")
    }

    #[test]
    fn test_run_reads_mapped_file() {
        let path = write_source("ok.lox", "print \"héllo\";\nprint 1 + 2;\n".as_bytes());

        let output = rox(&["run", path.to_str().expect("utf-8 path")]);

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "héllo\n3\n");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_empty_file_runs_cleanly() {
        let path = write_source("empty.lox", b"");

        let output = rox(&["run", path.to_str().expect("utf-8 path")]);

        assert!(output.status.success());
        assert!(output.stdout.is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let path = write_source("bad.lox", b"print 1;\xff\xfe\n");

        let output = rox(&["run", path.to_str().expect("utf-8 path")]);

        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("is not valid UTF-8"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_exit_status_reflects_error_kind() {
        let static_error = write_source("static.lox", b"print ;");
        let runtime_error = write_source("runtime.lox", b"print -\"x\";");

        assert_eq!(rox(&["run", static_error.to_str().expect("utf-8 path")]).status.code(), Some(65));
        assert_eq!(rox(&["run", runtime_error.to_str().expect("utf-8 path")]).status.code(), Some(70));

        let _ = fs::remove_file(static_error);
        let _ = fs::remove_file(runtime_error);
    }
}

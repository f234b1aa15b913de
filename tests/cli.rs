//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// 与用户环境隔离的命令：工作目录和 HOME 都指向临时目录
fn koreasel(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("koreasel").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .env_remove("KOREASEL_LOG_LEVEL")
        .env_remove("KOREASEL_STATE_FILE")
        .env_remove("KOREASEL_OPTION_TIMEOUT_MS")
        .env_remove("KOREASEL_POLL_INTERVAL_MS")
        .env_remove("KOREASEL_DISPATCH_BLUR")
        .arg("--state-file")
        .arg(state_file(dir.path()));
    cmd
}

fn state_file(dir: &Path) -> PathBuf {
    dir.join("storage.json")
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[cfg(test)]
mod passing {
    use super::*;

    const CHECKOUT: &str = "<!DOCTYPE html><html><head><title>Checkout</title></head><body>\
        <label for='c'>Country</label>\
        <select id='c'><option value='US'>United States</option><option value='KR'>South Korea</option></select>\
        </body></html>";

    #[test]
    fn run_selects_korea_and_records_stats() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("checkout.html");
        fs::write(&input, CHECKOUT).unwrap();

        let html = stdout_of(
            koreasel(&dir)
                .arg("run")
                .arg(&input)
                .arg("--url")
                .arg("https://shop.example/checkout"),
        );
        assert!(html.contains(r#"<option value="KR" selected="">"#));

        let stats = stdout_of(koreasel(&dir).arg("stats"));
        assert!(stats.contains("Total selections: 1"));
        assert!(stats.contains("https://shop.example/checkout"));
    }

    #[test]
    fn run_writes_output_file_and_handles_insertions() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("app.html");
        let fragment = dir.path().join("step2.html");
        let output = dir.path().join("out.html");
        fs::write(&input, "<div id='app'>loading</div>").unwrap();
        fs::write(
            &fragment,
            "<select name='nationality'><option>Japan</option><option>대한민국</option></select>",
        )
        .unwrap();

        koreasel(&dir)
            .arg("run")
            .arg(&input)
            .arg("-i")
            .arg(&fragment)
            .arg("-o")
            .arg(&output)
            .assert()
            .success();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains(r#"<option selected="">대한민국</option>"#));
    }

    #[test]
    fn toggle_off_leaves_document_unchanged() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("checkout.html");
        fs::write(&input, CHECKOUT).unwrap();

        let status = stdout_of(koreasel(&dir).arg("toggle").arg("off"));
        assert_eq!(status.trim(), "Disabled");

        let html = stdout_of(koreasel(&dir).arg("run").arg(&input));
        assert!(!html.contains("selected"));

        let stats = stdout_of(koreasel(&dir).arg("stats"));
        assert!(stats.contains("Total selections: 0"));
    }

    #[test]
    fn theme_and_stats_reset() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            stdout_of(koreasel(&dir).arg("theme").arg("dark")).trim(),
            "dark"
        );
        let raw = fs::read_to_string(state_file(dir.path())).unwrap();
        assert!(raw.contains(r#""theme": "dark""#));

        assert!(stdout_of(koreasel(&dir).arg("stats").arg("--reset")).contains("cleared"));
    }

    #[test]
    fn install_opens_welcome_only_the_first_time() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            stdout_of(koreasel(&dir).arg("install")).trim(),
            "https://koreasel.mirseo.dev/welcome"
        );

        koreasel(&dir).arg("toggle").arg("on").assert().success();
        assert_eq!(stdout_of(koreasel(&dir).arg("install")).trim(), "");
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use super::*;

    #[test]
    fn missing_input_file() {
        let dir = TempDir::new().unwrap();
        let output = koreasel(&dir)
            .arg("run")
            .arg("does-not-exist.html")
            .assert()
            .failure()
            .code(1)
            .get_output()
            .stderr
            .clone();
        assert!(String::from_utf8(output).unwrap().contains("File not found"));
    }

    #[test]
    fn unknown_encoding() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        fs::write(&input, "<p></p>").unwrap();
        koreasel(&dir)
            .arg("run")
            .arg(&input)
            .arg("--encoding")
            .arg("klingon")
            .assert()
            .failure()
            .code(1);
    }

    #[test]
    fn invalid_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("koreasel.toml"), "poll_interval_ms = 0\n").unwrap();
        koreasel(&dir).arg("stats").assert().failure().code(1);
    }

    #[test]
    fn unknown_theme() {
        let dir = TempDir::new().unwrap();
        koreasel(&dir).arg("theme").arg("sepia").assert().failure();
    }
}

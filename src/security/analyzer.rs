use super::CommandSafety;

/// Command names treated as modifying the system.
pub const DESTRUCTIVE_VERBS: [&str; 7] = ["rm", "mv", "chmod", "chown", "rmdir", "dd", "mkfs"];

/// Flag a command if any whitespace-separated token is exactly a destructive verb.
///
/// There is no notion of command position or structure: `echo rm` is
/// flagged, `mkfs.ext4` is not.
pub fn analyze_command(cmd: &str) -> CommandSafety {
    let mut found: Vec<String> = Vec::new();

    for token in cmd.split_whitespace() {
        if DESTRUCTIVE_VERBS.contains(&token) && !found.iter().any(|v| v == token) {
            found.push(token.to_string());
        }
    }

    if found.is_empty() {
        CommandSafety::Safe
    } else {
        CommandSafety::Warn(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_commands() {
        assert_eq!(analyze_command("ls -la"), CommandSafety::Safe);
        assert_eq!(analyze_command("df -h"), CommandSafety::Safe);
        assert_eq!(analyze_command(""), CommandSafety::Safe);
        assert_eq!(analyze_command("   "), CommandSafety::Safe);
    }

    #[test]
    fn test_each_destructive_verb() {
        for verb in DESTRUCTIVE_VERBS {
            let cmd = format!("{} something", verb);
            assert_eq!(
                analyze_command(&cmd),
                CommandSafety::Warn(vec![verb.to_string()]),
                "Failed for command: {}",
                cmd
            );
        }
    }

    #[test]
    fn test_verb_anywhere_in_command() {
        assert!(analyze_command("sudo rm -rf /tmp/x").is_risky());
        assert!(analyze_command("find . -name '*.o' | xargs rm").is_risky());
        assert!(analyze_command("echo rm").is_risky());
    }

    #[test]
    fn test_exact_token_match_only() {
        // Substrings and punctuation-adjacent verbs do not count.
        assert_eq!(analyze_command("mkfs.ext4 /dev/sdb1"), CommandSafety::Safe);
        assert_eq!(analyze_command("rmdir_helper --dry"), CommandSafety::Safe);
        assert_eq!(analyze_command("format;rm"), CommandSafety::Safe);
        assert_eq!(analyze_command("ls $(rm)"), CommandSafety::Safe);
        assert_eq!(analyze_command("RM file"), CommandSafety::Safe);
        assert_eq!(analyze_command("grep -r warm ."), CommandSafety::Safe);
    }

    #[test]
    fn test_multiple_verbs_reported_once() {
        assert_eq!(
            analyze_command("chmod 600 key && chown me key && chmod 700 dir"),
            CommandSafety::Warn(vec!["chmod".to_string(), "chown".to_string()])
        );
    }

    #[test]
    fn test_tabs_and_newlines_split_tokens() {
        assert!(analyze_command("cd /tmp\trm\tx").is_risky());
        assert!(analyze_command("dd\nif=/dev/zero").is_risky());
    }
}

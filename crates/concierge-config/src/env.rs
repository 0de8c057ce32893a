use std::sync::OnceLock;

use regex::Regex;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Matches `{{ env.VAR }}`; group 1 is the scoped key
    RE.get_or_init(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_.]+)\s*\}\}").expect("must be valid regex"))
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// Expansion happens on the raw config text before deserialization, so
/// config structs use plain `String`/`SecretString`. Lines starting with
/// `#` (TOML comments) are passed through unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;
        for captures in placeholder_re().captures_iter(line) {
            let overall = captures.get(0).expect("match always has group 0");
            let key = captures.get(1).expect("regex has one group").as_str();

            output.push_str(&line[last_end..overall.start()]);

            let Some(var_name) = key.strip_prefix("env.") else {
                return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
            };
            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => return Err(format!("environment variable not found: `{var_name}`")),
            }

            last_end = overall.end();
        }
        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::expand_env;

    #[test]
    fn passthrough_without_placeholders() {
        let input = "key = \"value\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_env_var() {
        temp_env::with_var("CONCIERGE_TEST_KEY", Some("sk-123"), || {
            let result = expand_env("api_key = \"{{ env.CONCIERGE_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-123\"");
        });
    }

    #[test]
    fn missing_var_is_an_error() {
        temp_env::with_var_unset("CONCIERGE_MISSING", || {
            let err = expand_env("key = \"{{ env.CONCIERGE_MISSING }}\"").unwrap_err();
            assert!(err.contains("CONCIERGE_MISSING"));
        });
    }

    #[test]
    fn unsupported_scope_is_an_error() {
        let err = expand_env("key = \"{{ vault.SECRET }}\"").unwrap_err();
        assert!(err.contains("env."));
    }

    #[test]
    fn comment_lines_skip_expansion() {
        temp_env::with_var_unset("CONCIERGE_MISSING", || {
            let input = "# key = \"{{ env.CONCIERGE_MISSING }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}

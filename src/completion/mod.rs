//! completion
//!
//! Shell completion scripts.
//!
//! The bash script is generated by `clap_complete` from the command tree and
//! extended with helpers that complete primitive and group names by asking
//! the controller (`atomix primitives`, `atomix groups`). The zsh script is
//! derived from the bash one by [`zsh::transpile`].

pub mod zsh;

use clap::Command;
use clap_complete::{generate, shells};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::core::types::PrimitiveKind;
use crate::error::CliError;

/// Shells we can generate completions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionShell {
    Bash,
    Zsh,
}

impl FromStr for CompletionShell {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(CompletionShell::Bash),
            "zsh" => Ok(CompletionShell::Zsh),
            other => Err(CliError::UnsupportedShell(other.to_string())),
        }
    }
}

/// Generate the completion script for `shell`.
pub fn generate_script(shell: CompletionShell, cmd: &mut Command) -> String {
    match shell {
        CompletionShell::Bash => generate_bash(cmd),
        CompletionShell::Zsh => generate_zsh(cmd),
    }
}

/// Bash completion script for `cmd`, including dynamic name helpers.
pub fn generate_bash(cmd: &mut Command) -> String {
    let name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shells::Bash, cmd, &name, &mut buf);

    let mut script = String::from_utf8_lossy(&buf).into_owned();
    script.push_str(&dynamic_helpers(&name));
    script
}

/// Zsh completion script for `cmd`.
pub fn generate_zsh(cmd: &mut Command) -> String {
    zsh::transpile(&generate_bash(cmd))
}

/// Functions that complete names from a live controller, and a wrapper that
/// routes `--name`, `--group` and `--type` values to them.
fn dynamic_helpers(bin: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        r#"
__{bin}_override_flag_list=(--controller --namespace --app --group -g)
__{bin}_override_flags()
{{
    local ${{__{bin}_override_flag_list[*]##*-}} two_word_of of var
    for w in "${{words[@]}}"; do
        if [ -n "${{two_word_of}}" ]; then
            eval "${{two_word_of##*-}}=\"${{two_word_of}}=\${{w}}\""
            two_word_of=
            continue
        fi
        for of in "${{__{bin}_override_flag_list[@]}}"; do
            case "${{w}}" in
                ${{of}}=*)
                    eval "${{of##*-}}=\"${{w}}\""
                    ;;
                ${{of}})
                    two_word_of="${{of}}"
                    ;;
            esac
        done
    done
    for var in "${{__{bin}_override_flag_list[@]##*-}}"; do
        if eval "test -n \"\$${{var}}\""; then
            eval "echo -n \${{${{var}}}}' '"
        fi
    done
}}

__{bin}_get_groups()
{{
    local {bin}_output out
    if {bin}_output=$({bin} groups $(__{bin}_override_flags) --no-headers 2>/dev/null); then
        out=($(echo "${{{bin}_output}}" | awk '{{print $1}}'))
        COMPREPLY=( $( compgen -W "${{out[*]}}" -- "$cur" ) )
    fi
}}

__{bin}_primitive_types()
{{
    COMPREPLY=( $( compgen -W "{kinds}" -- "$cur" ) )
}}
"#,
        kinds = PrimitiveKind::ALL
            .iter()
            .map(PrimitiveKind::as_str)
            .collect::<Vec<_>>()
            .join(" "),
    ));

    for kind in PrimitiveKind::ALL {
        let _ = write!(
            out,
            r#"
__{bin}_get_{kind}s()
{{
    local {bin}_output out
    if {bin}_output=$({bin} primitives $(__{bin}_override_flags) --type={kind} --no-headers 2>/dev/null); then
        out=($(echo "${{{bin}_output}}" | awk '{{print $1}}'))
        COMPREPLY=( $( compgen -W "${{out[*]}}" -- "$cur" ) )
    fi
}}
"#,
            kind = kind.as_str(),
        );
    }

    let arms: String = PrimitiveKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "                {kind}) __{bin}_get_{kind}s; return ;;\n",
                kind = kind.as_str()
            )
        })
        .collect();

    let _ = write!(
        out,
        r#"
__{bin}_complete()
{{
    local cur prev w kind
    local words=("${{COMP_WORDS[@]}}")
    cur="${{COMP_WORDS[COMP_CWORD]}}"
    prev="${{COMP_WORDS[COMP_CWORD-1]}}"
    for w in "${{COMP_WORDS[@]:1}}"; do
        case "${{w}}" in
            {alternatives})
                kind="${{w}}"
                break
                ;;
        esac
    done
    case "${{prev}}" in
        --name|-n)
            case "${{kind}}" in
{arms}            esac
            ;;
        --group|-g)
            __{bin}_get_groups
            return
            ;;
        --type)
            __{bin}_primitive_types
            return
            ;;
    esac
    _{bin} "$@"
}}

complete -F __{bin}_complete -o bashdefault -o default {bin}
"#,
        alternatives = PrimitiveKind::ALL
            .iter()
            .map(PrimitiveKind::as_str)
            .collect::<Vec<_>>()
            .join("|"),
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        Command::new("atomix")
            .subcommand(Command::new("lock").subcommand(Command::new("create")))
            .subcommand(Command::new("groups"))
    }

    #[test]
    fn parses_supported_shells() {
        assert_eq!("bash".parse::<CompletionShell>().unwrap(), CompletionShell::Bash);
        assert_eq!("zsh".parse::<CompletionShell>().unwrap(), CompletionShell::Zsh);

        let err = "fish".parse::<CompletionShell>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported shell type fish");
    }

    #[test]
    fn bash_includes_dynamic_helpers() {
        let script = generate_bash(&mut command());

        assert!(script.contains("_atomix()"));
        assert!(script.contains("__atomix_get_groups()"));
        for kind in PrimitiveKind::ALL {
            assert!(script.contains(&format!("__atomix_get_{}s()", kind.as_str())));
            assert!(script.contains(&format!("--type={} --no-headers", kind.as_str())));
        }
        assert!(script.contains("counter|election|list|lock|map|set)"));
        assert!(script.ends_with("complete -F __atomix_complete -o bashdefault -o default atomix\n"));
    }

    #[test]
    fn zsh_wraps_bash() {
        let bash = generate_bash(&mut command());
        let zsh = generate_zsh(&mut command());

        assert!(zsh.starts_with(zsh::HEADER));
        assert!(zsh.contains(&bash));
    }

    #[test]
    fn zsh_is_deterministic() {
        assert_eq!(generate_zsh(&mut command()), generate_zsh(&mut command()));
    }
}

//! completion::zsh
//!
//! Bash-to-zsh completion transpiler.
//!
//! The zsh script is the bash script run through `sed` at load time, inside
//! zsh's `bashcompinit` emulation. This module emits:
//!
//! 1. the `#compdef` header and shims for bash builtins zsh lacks
//! 2. GNU/BSD `sed` word-boundary detection
//! 3. a `sed` invocation built from [`RULES`], in order
//! 4. the bash script in a quoted heredoc, then the trailer that sources the
//!    converted script
//!
//! Output is a pure function of the bash input.

/// Header line zsh uses to bind the script to the command.
pub const HEADER: &str = "#compdef atomix\n";

const PREAMBLE: &str = r##"
__atomix_bash_source() {
	alias shopt=':'
	alias _expand=_bash_expand
	alias _complete=_bash_comp
	emulate -L sh
	setopt kshglob noshglob braceexpand

	source "$@"
}

__atomix_type() {
	# -t is not supported by zsh
	if [ "$1" == "-t" ]; then
		shift

		# fake Bash 4 to disable "complete -o nospace". Instead
		# "compopt +-o nospace" is used in the code to toggle trailing
		# spaces. We don't support that, but leave trailing spaces on
		# all the time
		if [ "$1" = "__atomix_compopt" ]; then
			echo builtin
			return 0
		fi
	fi
	type "$@"
}

__atomix_compgen() {
	local completions w
	completions=( $(compgen "$@") ) || return $?

	# filter by given word as prefix
	while [[ "$1" = -* && "$1" != -- ]]; do
		shift
		shift
	done
	if [[ "$1" == -- ]]; then
		shift
	fi
	for w in "${completions[@]}"; do
		if [[ "${w}" = "$1"* ]]; then
			echo "${w}"
		fi
	done
}

__atomix_compopt() {
	true # don't do anything. Not supported by bashcompinit in zsh
}

__atomix_ltrim_colon_completions()
{
	if [[ "$1" == *:* && "$COMP_WORDBREAKS" == *:* ]]; then
		# Remove colon-word prefix from COMPREPLY items
		local colon_word=${1%${1##*:}}
		local i=${#COMPREPLY[*]}
		while [[ $((--i)) -ge 0 ]]; do
			COMPREPLY[$i]=${COMPREPLY[$i]#"$colon_word"}
		done
	fi
}

__atomix_get_comp_words_by_ref() {
	cur="${COMP_WORDS[COMP_CWORD]}"
	prev="${COMP_WORDS[${COMP_CWORD}-1]}"
	words=("${COMP_WORDS[@]}")
	cword=("${COMP_CWORD[@]}")
}

__atomix_filedir() {
	local RET OLD_IFS w qw

	if [[ "$1" = \~* ]]; then
		# somehow does not work. Maybe, zsh does not call this at all
		eval echo "$1"
		return 0
	fi

	OLD_IFS="$IFS"
	IFS=$'\n'
	if [ "$1" = "-d" ]; then
		shift
		RET=( $(compgen -d) )
	else
		RET=( $(compgen -f) )
	fi
	IFS="$OLD_IFS"

	for w in ${RET[@]}; do
		if [[ ! "${w}" = "${cur}"* ]]; then
			continue
		fi
		if eval "[[ \"\${w}\" = *.$1 || -d \"\${w}\" ]]"; then
			qw="$(__atomix_quote "${w}")"
			if [ -d "${w}" ]; then
				COMPREPLY+=("${qw}/")
			else
				COMPREPLY+=("${qw}")
			fi
		fi
	done
}

__atomix_quote() {
    if [[ $1 == \'* || $1 == \"* ]]; then
        # Leave out first character
        printf %q "${1:1}"
    else
    	printf %q "$1"
    fi
}

autoload -U +X bashcompinit && bashcompinit

# use word boundary patterns for BSD or GNU sed
LWORD='[[:<:]]'
RWORD='[[:>:]]'
if sed --help 2>&1 | grep -q GNU; then
	LWORD='\<'
	RWORD='\>'
fi

__atomix_convert_bash_to_zsh() {
	sed \
"##;

const HEREDOC_OPEN: &str = "\t<<'BASH_COMPLETION_EOF'\n";

const TRAILER: &str = "
BASH_COMPLETION_EOF
}

__atomix_bash_source <(__atomix_convert_bash_to_zsh)
_complete atomix 2>/dev/null
";

/// How a rule's pattern is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Literal pattern, first match per line
    None,
    /// Whole word on both sides, every match
    Word,
    /// Word boundary on the right only, every match
    Right,
}

/// One `sed` substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewrite {
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub bounds: Bounds,
}

impl Rewrite {
    const fn literal(pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            pattern,
            replacement,
            bounds: Bounds::None,
        }
    }

    const fn word(pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            pattern,
            replacement,
            bounds: Bounds::Word,
        }
    }

    /// Render as one `-e` argument line of the `sed` call.
    pub fn render(&self) -> String {
        match self.bounds {
            Bounds::None => format!("\t-e 's/{}/{}/' \\\n", self.pattern, self.replacement),
            Bounds::Word => format!(
                "\t-e \"s/${{LWORD}}{}${{RWORD}}/{}/g\" \\\n",
                self.pattern, self.replacement
            ),
            Bounds::Right => format!(
                "\t-e \"s/{}${{RWORD}}/{}/g\" \\\n",
                self.pattern, self.replacement
            ),
        }
    }
}

/// Substitutions applied to the bash script, in order.
pub const RULES: &[Rewrite] = &[
    Rewrite::literal("declare -F", "whence -w"),
    Rewrite::literal(
        r#"_get_comp_words_by_ref "\$@""#,
        r#"_get_comp_words_by_ref "\$*""#,
    ),
    Rewrite::literal(r"local \([a-zA-Z0-9_]*\)=", r"local \1; \1="),
    Rewrite::literal(
        r#"flags+=("\(--.*\)=")"#,
        r#"flags+=("\1"); two_word_flags+=("\1")"#,
    ),
    Rewrite::literal(
        r#"must_have_one_flag+=("\(--.*\)=")"#,
        r#"must_have_one_flag+=("\1")"#,
    ),
    Rewrite::word("_filedir", "__atomix_filedir"),
    Rewrite::word("_get_comp_words_by_ref", "__atomix_get_comp_words_by_ref"),
    Rewrite::word(
        "__ltrim_colon_completions",
        "__atomix_ltrim_colon_completions",
    ),
    Rewrite::word("compgen", "__atomix_compgen"),
    Rewrite::word("compopt", "__atomix_compopt"),
    Rewrite::word("declare", "builtin declare"),
    Rewrite {
        pattern: r"\\\$(type",
        replacement: r"\$(__atomix_type",
        bounds: Bounds::Right,
    },
];

/// Wrap a bash completion script so zsh can load it.
pub fn transpile(bash: &str) -> String {
    let mut out = String::with_capacity(HEADER.len() + PREAMBLE.len() + bash.len() + 2048);
    out.push_str(HEADER);
    out.push_str(PREAMBLE);
    for rule in RULES {
        out.push_str(&rule.render());
    }
    out.push_str(HEREDOC_OPEN);
    out.push_str(bash);
    out.push_str(TRAILER);
    out
}

//! Well-known POSIX utilities and the documentation page that describes each.

use std::collections::HashMap;

/// Page group of the POSIX utilities (XCU) in the man page corpus.
const UTILITIES: &str = "man1p";

/// Every POSIX utility and special built-in with a page in the corpus.
/// Kept sorted so additions are easy to review.
const POSIX_COMMANDS: &[(&str, &str)] = &[
    ("admin", UTILITIES),
    ("alias", UTILITIES),
    ("ar", UTILITIES),
    ("asa", UTILITIES),
    ("at", UTILITIES),
    ("awk", UTILITIES),
    ("basename", UTILITIES),
    ("batch", UTILITIES),
    ("bc", UTILITIES),
    ("bg", UTILITIES),
    ("break", UTILITIES),
    ("c99", UTILITIES),
    ("cal", UTILITIES),
    ("cat", UTILITIES),
    ("cd", UTILITIES),
    ("cflow", UTILITIES),
    ("chgrp", UTILITIES),
    ("chmod", UTILITIES),
    ("chown", UTILITIES),
    ("cksum", UTILITIES),
    ("cmp", UTILITIES),
    ("comm", UTILITIES),
    ("command", UTILITIES),
    ("compress", UTILITIES),
    ("continue", UTILITIES),
    ("cp", UTILITIES),
    ("crontab", UTILITIES),
    ("csplit", UTILITIES),
    ("ctags", UTILITIES),
    ("cut", UTILITIES),
    ("cxref", UTILITIES),
    ("date", UTILITIES),
    ("dd", UTILITIES),
    ("delta", UTILITIES),
    ("df", UTILITIES),
    ("diff", UTILITIES),
    ("dirname", UTILITIES),
    ("du", UTILITIES),
    ("echo", UTILITIES),
    ("ed", UTILITIES),
    ("env", UTILITIES),
    ("eval", UTILITIES),
    ("ex", UTILITIES),
    ("exec", UTILITIES),
    ("exit", UTILITIES),
    ("expand", UTILITIES),
    ("export", UTILITIES),
    ("expr", UTILITIES),
    ("false", UTILITIES),
    ("fc", UTILITIES),
    ("fg", UTILITIES),
    ("file", UTILITIES),
    ("find", UTILITIES),
    ("fold", UTILITIES),
    ("fort77", UTILITIES),
    ("fuser", UTILITIES),
    ("gencat", UTILITIES),
    ("get", UTILITIES),
    ("getconf", UTILITIES),
    ("getopts", UTILITIES),
    ("grep", UTILITIES),
    ("hash", UTILITIES),
    ("head", UTILITIES),
    ("iconv", UTILITIES),
    ("id", UTILITIES),
    ("ipcrm", UTILITIES),
    ("ipcs", UTILITIES),
    ("jobs", UTILITIES),
    ("join", UTILITIES),
    ("kill", UTILITIES),
    ("lex", UTILITIES),
    ("link", UTILITIES),
    ("ln", UTILITIES),
    ("locale", UTILITIES),
    ("localedef", UTILITIES),
    ("logger", UTILITIES),
    ("logname", UTILITIES),
    ("lp", UTILITIES),
    ("ls", UTILITIES),
    ("m4", UTILITIES),
    ("mailx", UTILITIES),
    ("make", UTILITIES),
    ("man", UTILITIES),
    ("mesg", UTILITIES),
    ("mkdir", UTILITIES),
    ("mkfifo", UTILITIES),
    ("more", UTILITIES),
    ("mv", UTILITIES),
    ("newgrp", UTILITIES),
    ("nice", UTILITIES),
    ("nl", UTILITIES),
    ("nm", UTILITIES),
    ("nohup", UTILITIES),
    ("od", UTILITIES),
    ("paste", UTILITIES),
    ("patch", UTILITIES),
    ("pathchk", UTILITIES),
    ("pax", UTILITIES),
    ("pr", UTILITIES),
    ("printf", UTILITIES),
    ("prs", UTILITIES),
    ("ps", UTILITIES),
    ("pwd", UTILITIES),
    ("qalter", UTILITIES),
    ("qdel", UTILITIES),
    ("qhold", UTILITIES),
    ("qmove", UTILITIES),
    ("qmsg", UTILITIES),
    ("qrerun", UTILITIES),
    ("qrls", UTILITIES),
    ("qselect", UTILITIES),
    ("qsig", UTILITIES),
    ("qstat", UTILITIES),
    ("qsub", UTILITIES),
    ("read", UTILITIES),
    ("readonly", UTILITIES),
    ("renice", UTILITIES),
    ("return", UTILITIES),
    ("rm", UTILITIES),
    ("rmdel", UTILITIES),
    ("rmdir", UTILITIES),
    ("sact", UTILITIES),
    ("sccs", UTILITIES),
    ("sed", UTILITIES),
    ("set", UTILITIES),
    ("sh", UTILITIES),
    ("shift", UTILITIES),
    ("sleep", UTILITIES),
    ("sort", UTILITIES),
    ("split", UTILITIES),
    ("strings", UTILITIES),
    ("strip", UTILITIES),
    ("stty", UTILITIES),
    ("tabs", UTILITIES),
    ("tail", UTILITIES),
    ("talk", UTILITIES),
    ("tee", UTILITIES),
    ("test", UTILITIES),
    ("time", UTILITIES),
    ("times", UTILITIES),
    ("touch", UTILITIES),
    ("tput", UTILITIES),
    ("tr", UTILITIES),
    ("trap", UTILITIES),
    ("true", UTILITIES),
    ("tsort", UTILITIES),
    ("tty", UTILITIES),
    ("type", UTILITIES),
    ("ulimit", UTILITIES),
    ("umask", UTILITIES),
    ("unalias", UTILITIES),
    ("uname", UTILITIES),
    ("uncompress", UTILITIES),
    ("unexpand", UTILITIES),
    ("unget", UTILITIES),
    ("uniq", UTILITIES),
    ("unlink", UTILITIES),
    ("unset", UTILITIES),
    ("uucp", UTILITIES),
    ("uudecode", UTILITIES),
    ("uuencode", UTILITIES),
    ("uustat", UTILITIES),
    ("uux", UTILITIES),
    ("val", UTILITIES),
    ("vi", UTILITIES),
    ("wait", UTILITIES),
    ("wc", UTILITIES),
    ("what", UTILITIES),
    ("who", UTILITIES),
    ("write", UTILITIES),
    ("xargs", UTILITIES),
    ("yacc", UTILITIES),
    ("zcat", UTILITIES),
];

/// Immutable command name to documentation page mapping. Built once at
/// startup and shared by reference with every file scan.
#[derive(Debug, Clone)]
pub struct CommandTable {
    /// Command name to page group.
    pages: HashMap<&'static str, &'static str>,
}

#[allow(clippy::len_without_is_empty, reason = "the table is never empty")]
impl CommandTable {
    /// Number of commands in the table.
    pub fn len(&self) -> usize {
        return self.pages.len();
    }

    /// Exact, case-sensitive lookup of a command's documentation page.
    pub fn page_for(&self, command: &str) -> Option<&'static str> {
        return self.pages.get(command).copied();
    }

    /// The POSIX utilities table.
    pub fn posix() -> Self {
        return Self {
            pages: POSIX_COMMANDS.iter().copied().collect(),
        };
    }
}

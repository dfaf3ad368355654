const BLANKS: [char; 2] = [' ', '\t'];

/// Everything after the program name in a raw Windows command line, left
/// untouched so quoting survives when it is handed on.
pub fn command_line_tail(raw: &str) -> &str {
    let raw = raw.trim_start_matches(BLANKS);

    let rest = if let Some(quoted) = raw.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) => &quoted[end + 1..],
            None => "",
        }
    } else {
        match raw.find(BLANKS) {
            Some(end) => &raw[end..],
            None => "",
        }
    };

    rest.trim_start_matches(BLANKS)
}

/// Splits an argument string on blanks. Double quotes group, `\"` is a literal quote.
pub fn split_arguments(arguments: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = arguments.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
                in_token = true;
            }
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if BLANKS.contains(&c) && !quoted => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        args.push(current);
    }
    args
}

/// Inverse of `split_arguments` for arguments that arrive already split.
pub fn join_arguments<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.is_empty() || arg.contains(BLANKS) || arg.contains('"') {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

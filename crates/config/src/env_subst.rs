/// Expand `${NAME}` placeholders from the process environment.
///
/// Unknown variables and unterminated placeholders are kept verbatim.
pub fn substitute_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "ATTR" => Some("rpc.message".into()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_variables() {
        assert_eq!(
            expand_with("message_attribute = \"${ATTR}\"", lookup),
            "message_attribute = \"rpc.message\""
        );
        assert_eq!(expand_with("a${EMPTY}b", lookup), "ab");
    }

    #[test]
    fn keeps_unknown_and_malformed_placeholders() {
        assert_eq!(expand_with("${MISSING} ok", lookup), "${MISSING} ok");
        assert_eq!(expand_with("${} ok", lookup), "${} ok");
        assert_eq!(expand_with("tail ${ATTR", lookup), "tail ${ATTR");
    }

    #[test]
    fn handles_multiple_placeholders() {
        assert_eq!(
            expand_with("${ATTR}/${MISSING}/${ATTR}", lookup),
            "rpc.message/${MISSING}/rpc.message"
        );
    }
}

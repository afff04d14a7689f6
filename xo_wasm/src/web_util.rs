// Value of cookie `name` in a `document.cookie` string ("a=1; b=2").
pub fn parse_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_owned())
    })
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cookies() {
        let cookies = "sessionid=abc; csrftoken=Xy12z; theme=dark";
        assert_eq!(parse_cookie(cookies, "csrftoken"), Some("Xy12z".to_owned()));
        assert_eq!(parse_cookie(cookies, "theme"), Some("dark".to_owned()));
        assert_eq!(parse_cookie(cookies, "csrf"), None);
        assert_eq!(parse_cookie("", "csrftoken"), None);
        assert_eq!(parse_cookie("csrftoken=", "csrftoken"), Some(String::new()));
    }
}

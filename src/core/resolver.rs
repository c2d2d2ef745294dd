use std::borrow::Cow;
use url::Url;

/// 將任意網域字串正規化為資料集的查詢鍵
///
/// `https://www.Example.com/path` 與 `example.com` 都會得到 `example.com`。
/// 解析失敗時退回純文字處理，永遠不會失敗。
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    match parse_host(trimmed) {
        Some(host) => strip_www(&host.to_lowercase()).to_string(),
        None => strip_textually(trimmed),
    }
}

fn parse_host(input: &str) -> Option<String> {
    let candidate = if input.contains("://") {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("https://{}", input))
    };

    let url = Url::parse(&candidate).ok()?;
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
}

fn strip_textually(input: &str) -> String {
    let lowered = input.to_lowercase();
    let rest = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let rest = strip_www(rest);
    rest.split_once('/').map_or(rest, |(head, _)| head).to_string()
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// 從網址或 query string 取出 `site` 參數 (空值視為未提供)
pub fn site_param(location: &str) -> Option<String> {
    let query = location
        .split_once('?')
        .map_or(location, |(_, query)| query);
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "site")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

use super::spec::{END_OF_HEADERS, RequestSpec};
use crate::network::TargetEndpoint;
use crate::{Result, StormError};
use bytes::{BufMut, Bytes, BytesMut};
use http::header::{ACCEPT_CHARSET, CONNECTION, HOST, USER_AGENT};
use http::{Method, Request, Version};
use std::fmt;
use std::str::FromStr;

/// Built-in request payloads mirroring the classic probes run against the
/// server under test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Static page fetch used by the connection storm
    Get,
    /// `HEAD` of a scripted page on a keep-alive connection
    Head,
    /// Root fetch negotiating a list of legacy charsets
    Charset,
    /// Raw `STOP` control command
    Stop,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Get, Preset::Head, Preset::Charset, Preset::Stop];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Get => "get",
            Preset::Head => "head",
            Preset::Charset => "charset",
            Preset::Stop => "stop",
        }
    }

    /// Renders the preset for the given target
    pub fn request_spec(&self, endpoint: &TargetEndpoint) -> Result<RequestSpec> {
        let payload = match self {
            Preset::Get => render(
                Request::builder()
                    .method(Method::GET)
                    .uri("/dhtml/atree/drag_and_drop.html")
                    .header(USER_AGENT, "Mozilla")
                    .header(HOST, endpoint.to_string()),
            )?,
            Preset::Head => render(
                Request::builder()
                    .method(Method::HEAD)
                    .uri("/server_data/python/get.py")
                    .header(CONNECTION, "keep-alive"),
            )?,
            Preset::Charset => render(
                Request::builder()
                    .method(Method::GET)
                    .uri("/")
                    .header(ACCEPT_CHARSET, "Windows-1251, iso-8859-5, unicode-1-1;q=0.8"),
            )?,
            Preset::Stop => {
                let mut out = BytesMut::from(&b"STOP"[..]);
                out.put_slice(END_OF_HEADERS);
                out.freeze()
            }
        };

        Ok(RequestSpec::with_default_terminator(payload))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = StormError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                StormError::Config(format!(
                    "unknown preset '{s}' (expected get, head, charset or stop)"
                ))
            })
    }
}

/// Serializes an HTTP/1.x request head, ending with the blank line
fn render(builder: http::request::Builder) -> Result<Bytes> {
    let request = builder
        .version(Version::HTTP_11)
        .body(())
        .map_err(|e| StormError::Config(format!("invalid preset request: {e}")))?;

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let version = match request.version() {
        Version::HTTP_10 => "HTTP/1.0",
        _ => "HTTP/1.1",
    };

    let mut out = BytesMut::with_capacity(256);
    out.put_slice(request.method().as_str().as_bytes());
    out.put_u8(b' ');
    out.put_slice(target.as_bytes());
    out.put_u8(b' ');
    out.put_slice(version.as_bytes());
    out.put_slice(b"\r\n");
    for (name, value) in request.headers() {
        out.put_slice(title_case(name.as_str()).as_bytes());
        out.put_slice(b": ");
        out.put_slice(value.as_bytes());
        out.put_slice(b"\r\n");
    }
    out.put_slice(b"\r\n");

    Ok(out.freeze())
}

/// `accept-charset` -> `Accept-Charset`
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> TargetEndpoint {
        TargetEndpoint::new("localhost", 5555)
    }

    #[test]
    fn test_get_preset_bytes() {
        let spec = Preset::Get.request_spec(&endpoint()).unwrap();
        assert_eq!(
            &spec.payload[..],
            &b"GET /dhtml/atree/drag_and_drop.html HTTP/1.1\r\nUser-Agent: Mozilla\r\nHost: localhost:5555\r\n\r\n"[..]
        );
    }

    #[test]
    fn test_stop_preset_bytes() {
        let spec = Preset::Stop.request_spec(&endpoint()).unwrap();
        assert_eq!(&spec.payload[..], b"STOP\r\n\r\n");
    }

    #[test]
    fn test_http_presets_parse_as_complete_requests() {
        for preset in [Preset::Get, Preset::Head, Preset::Charset] {
            let spec = preset.request_spec(&endpoint()).unwrap();
            let mut headers = [httparse::EMPTY_HEADER; 8];
            let mut request = httparse::Request::new(&mut headers);
            let status = request.parse(&spec.payload).unwrap();
            assert!(status.is_complete(), "{preset} is not a complete request");
            assert_eq!(request.version, Some(1));
        }
    }

    #[test]
    fn test_all_presets_terminated() {
        for preset in Preset::ALL {
            assert!(preset.request_spec(&endpoint()).unwrap().is_terminated());
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("CHARSET".parse::<Preset>().unwrap(), Preset::Charset);
        assert!("post".parse::<Preset>().is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("accept-charset"), "Accept-Charset");
        assert_eq!(title_case("host"), "Host");
    }
}

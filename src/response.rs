use std::borrow::Cow;

/// Anything that carries a response body to be checked against a schema.
///
/// HTTP client and framework response types can implement this by
/// returning their buffered body text.
pub trait ResponseBody {
    fn body(&self) -> Cow<'_, str>;

    /// Raw body bytes. Bodies that are not UTF-8 fail to parse as JSON
    /// and are reported as a mismatch.
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        match self.body() {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        }
    }
}

impl ResponseBody for str {
    fn body(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ResponseBody for String {
    fn body(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl ResponseBody for [u8] {
    fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }

    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl ResponseBody for Vec<u8> {
    fn body(&self) -> Cow<'_, str> {
        self.as_slice().body()
    }

    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl ResponseBody for serde_json::Value {
    fn body(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl<T: ResponseBody + ?Sized> ResponseBody for &T {
    fn body(&self) -> Cow<'_, str> {
        (**self).body()
    }

    fn body_bytes(&self) -> Cow<'_, [u8]> {
        (**self).body_bytes()
    }
}

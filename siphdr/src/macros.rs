macro_rules! lookup_table {
    ($name:ident => $( $slice:expr ),+) => {
        const $name: [bool; 256] = {
            let mut arr = [false; 256];
            $(
                let mut i = 0;
                while i < $slice.len() {
                    arr[$slice[i] as usize] = true;
                    i += 1;
                }
            )*
            arr
        };
    };
}

macro_rules! comma_separated {
    ($scanner:ident => $body:expr) => {{
        util::space!($scanner);
        $body

        while let Some(b',') = $scanner.peek() {
            $scanner.next();
            util::space!($scanner);
            $body
        }
    }};
}

macro_rules! try_parse_hdr {
    ($header:ident, $raw:expr) => {
        match $header::parse($raw) {
            Ok(header) => return Ok(Header::$header(header)),
            Err($crate::Error::WrongHeaderType { .. }) => (),
            Err(err) => {
                tracing::debug!(header = $header::NAME, %err, "rejected header");
                return Err(err);
            }
        }
    };
}

pub(crate) use comma_separated;
pub(crate) use lookup_table;
pub(crate) use try_parse_hdr;

//! Serde adapters for the persisted page format.
//!
//! Blobs travel as standard base64 strings and frames as `[[x, y], [w, h]]`,
//! matching documents written by the mobile client.

pub(crate) mod base64_bytes {
    use base64::{Engine, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(&s)
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod base64_bytes_opt {
    use base64::{Engine, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_some(&general_purpose::STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| {
            general_purpose::STANDARD
                .decode(&s)
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

pub(crate) mod frame {
    use kurbo::{Point, Size};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::document::item::Frame;

    pub fn serialize<S>(frame: &Frame, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [
            [frame.origin.x, frame.origin.y],
            [frame.size.width, frame.size.height],
        ]
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Frame, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [[x, y], [w, h]] = <[[f64; 2]; 2]>::deserialize(deserializer)?;
        Ok(Frame::new(Point::new(x, y), Size::new(w, h)))
    }
}

use crate::error::DecodeError;
use crate::model::Track;
use serde_json::{Map, Value};

/// Decodes a catalog response body of the shape `{ "results": [ ... ] }`.
///
/// Result order is preserved. Extra keys (`resultCount`, `kind`, ...) are ignored.
pub fn decode_results(bytes: &[u8]) -> Result<Vec<Track>, DecodeError> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let results = root
        .get("results")
        .and_then(Value::as_array)
        .ok_or(DecodeError::MissingResults)?;

    results
        .iter()
        .enumerate()
        .map(|(index, item)| decode_track(index, item))
        .collect()
}

/// Decodes a single result object. `index` only feeds error reporting.
pub fn decode_track(index: usize, value: &Value) -> Result<Track, DecodeError> {
    let obj = value.as_object().ok_or(DecodeError::InvalidField {
        index,
        field: "results[]",
        expected: "an object",
    })?;

    let id = required(obj, index, "trackId", "an integer", Value::as_i64)?;
    let artist_name = required(obj, index, "artistName", "a string", |v| {
        v.as_str().map(str::to_string)
    })?;
    let track_name = required(obj, index, "trackName", "a string", |v| {
        v.as_str().map(str::to_string)
    })?;

    Ok(Track {
        id,
        artist_name,
        collection_name: optional_string(obj, "collectionName"),
        track_name,
        preview_url: optional_string(obj, "previewUrl"),
        artwork_url: optional_string(obj, "artworkUrl60"),
    })
}

fn required<T>(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
    expected: &'static str,
    extract: impl Fn(&Value) -> Option<T>,
) -> Result<T, DecodeError> {
    let value = obj
        .get(field)
        .ok_or(DecodeError::MissingField { index, field })?;
    extract(value).ok_or(DecodeError::InvalidField {
        index,
        field,
        expected,
    })
}

// Optional fields never fail the decode; a null or mistyped value reads as absent.
fn optional_string(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::decode_results;
    use crate::error::DecodeError;

    #[test]
    fn decodes_full_payload_in_order() {
        let body = br#"{
            "resultCount": 2,
            "results": [
                {
                    "wrapperType": "track",
                    "trackId": 120954025,
                    "artistName": "Jack Johnson",
                    "collectionName": "Sing-a-Longs and Lullabies for the Film Curious George",
                    "trackName": "Upside Down",
                    "previewUrl": "http://a1099.itunes.apple.com/r10/Music/f9/54/43/mzi.gqvqlvcq.aac.p.m4p",
                    "artworkUrl60": "http://a1.itunes.apple.com/r10/Music/3b/6a/33/mzi.qzdqwsel.60x60-50.jpg"
                },
                {
                    "trackId": 2,
                    "artistName": "Another Artist",
                    "trackName": "Another Song"
                }
            ]
        }"#;

        let tracks = decode_results(body).unwrap();
        assert_eq!(tracks.len(), 2);

        let first = &tracks[0];
        assert_eq!(first.id, 120954025);
        assert_eq!(first.artist_name, "Jack Johnson");
        assert_eq!(
            first.collection_name.as_deref(),
            Some("Sing-a-Longs and Lullabies for the Film Curious George")
        );
        assert_eq!(first.track_name, "Upside Down");
        assert_eq!(
            first.preview_url.as_deref(),
            Some("http://a1099.itunes.apple.com/r10/Music/f9/54/43/mzi.gqvqlvcq.aac.p.m4p")
        );
        assert_eq!(
            first.artwork_url.as_deref(),
            Some("http://a1.itunes.apple.com/r10/Music/3b/6a/33/mzi.qzdqwsel.60x60-50.jpg")
        );

        let second = &tracks[1];
        assert_eq!(second.id, 2);
        assert!(second.collection_name.is_none());
        assert!(second.preview_url.is_none());
        assert!(second.artwork_url.is_none());
    }

    #[test]
    fn empty_results_are_not_an_error() {
        let tracks = decode_results(br#"{"resultCount":0,"results":[]}"#).unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn mistyped_optional_fields_read_as_absent() {
        let body = br#"{"results":[{
            "trackId": 5,
            "artistName": "A",
            "trackName": "S",
            "collectionName": 42,
            "previewUrl": null,
            "artworkUrl60": ["x"]
        }]}"#;

        let tracks = decode_results(body).unwrap();
        assert!(tracks[0].collection_name.is_none());
        assert!(tracks[0].preview_url.is_none());
        assert!(tracks[0].artwork_url.is_none());
    }

    #[test]
    fn string_track_id_names_the_field() {
        let body = br#"{"results":[{
            "trackId": "invalid_id",
            "artistName": "Invalid Artist",
            "trackName": "Invalid Song"
        }]}"#;

        let err = decode_results(body).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidField {
                index: 0,
                field: "trackId",
                expected: "an integer"
            }
        );
        assert_eq!(err.field(), Some("trackId"));
    }

    #[test]
    fn missing_required_field_fails_whole_decode() {
        let body = br#"{"results":[
            {"trackId": 1, "artistName": "A", "trackName": "S"},
            {"trackId": 2, "artistName": "B"}
        ]}"#;

        let err = decode_results(body).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                index: 1,
                field: "trackName"
            }
        );
    }

    #[test]
    fn fractional_id_is_rejected() {
        let body = br#"{"results":[{"trackId": 1.5, "artistName": "A", "trackName": "S"}]}"#;
        let err = decode_results(body).unwrap_err();
        assert_eq!(err.field(), Some("trackId"));
    }

    #[test]
    fn rejects_non_json_and_missing_results() {
        assert!(matches!(
            decode_results(b"<html>oops</html>"),
            Err(DecodeError::Malformed(_))
        ));
        assert_eq!(
            decode_results(br#"{"errorMessage":"bad"}"#).unwrap_err(),
            DecodeError::MissingResults
        );
        assert_eq!(
            decode_results(br#"{"results":{}}"#).unwrap_err(),
            DecodeError::MissingResults
        );
    }

    mod properties {
        use super::super::decode_results;
        use crate::error::DecodeError;
        use proptest::prelude::*;
        use serde_json::{json, Value};

        const REQUIRED: [&str; 3] = ["trackId", "artistName", "trackName"];

        fn body(value: &Value) -> Vec<u8> {
            serde_json::to_vec(&json!({ "resultCount": 1, "results": [value] })).unwrap()
        }

        proptest! {
            #[test]
            fn decoded_fields_match_the_payload(
                id in any::<i64>(),
                artist in any::<String>(),
                name in any::<String>(),
                collection in proptest::option::of(any::<String>()),
                preview in proptest::option::of(any::<String>()),
                artwork in proptest::option::of(any::<String>()),
            ) {
                let mut item = json!({
                    "trackId": id,
                    "artistName": artist,
                    "trackName": name,
                });
                if let Some(v) = &collection {
                    item["collectionName"] = json!(v);
                }
                if let Some(v) = &preview {
                    item["previewUrl"] = json!(v);
                }
                if let Some(v) = &artwork {
                    item["artworkUrl60"] = json!(v);
                }

                let tracks = decode_results(&body(&item)).unwrap();
                prop_assert_eq!(tracks.len(), 1);
                let track = &tracks[0];
                prop_assert_eq!(track.id, id);
                prop_assert_eq!(&track.artist_name, &artist);
                prop_assert_eq!(&track.track_name, &name);
                prop_assert_eq!(&track.collection_name, &collection);
                prop_assert_eq!(&track.preview_url, &preview);
                prop_assert_eq!(&track.artwork_url, &artwork);
            }

            #[test]
            fn broken_required_field_is_named(
                id in any::<i64>(),
                artist in any::<String>(),
                name in any::<String>(),
                key in 0..REQUIRED.len(),
                drop in any::<bool>(),
            ) {
                let field = REQUIRED[key];
                let mut item = json!({
                    "trackId": id,
                    "artistName": artist,
                    "trackName": name,
                });
                let obj = item.as_object_mut().unwrap();
                if drop {
                    obj.remove(field);
                } else if field == "trackId" {
                    obj.insert(field.to_string(), json!(id.to_string()));
                } else {
                    obj.insert(field.to_string(), json!(id));
                }

                let err = decode_results(&body(&item)).unwrap_err();
                prop_assert_eq!(err.field(), Some(field));
                if drop {
                    prop_assert_eq!(err, DecodeError::MissingField { index: 0, field });
                } else {
                    let is_invalid = matches!(err, DecodeError::InvalidField { index: 0, .. });
                    prop_assert!(is_invalid);
                }
            }
        }
    }
}

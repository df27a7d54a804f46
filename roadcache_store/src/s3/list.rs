//! Parsing of `ListObjectsV2` responses and S3 error documents.
//!
//! Only a handful of elements is needed, so they are extracted directly instead of deserializing the whole
//! document:
//! ```xml
//! <ListBucketResult>
//!   <IsTruncated>true</IsTruncated>
//!   <Contents><Key>graphs/Berlin_drive.graphml</Key>...</Contents>
//!   <NextContinuationToken>1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=</NextContinuationToken>
//! </ListBucketResult>
//! ```

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListPage {
	pub keys: Vec<String>,
	/// Token for the next page, only set when the listing is truncated.
	pub next_token: Option<String>,
}

impl ListPage {
	pub fn parse(xml: &str) -> ListPage {
		let keys = tag_values(xml, "Key").map(unescape).collect();
		let truncated = tag_values(xml, "IsTruncated").next().is_some_and(|v| v.trim() == "true");
		let next_token = if truncated {
			tag_values(xml, "NextContinuationToken").next().map(unescape)
		} else {
			None
		};
		ListPage { keys, next_token }
	}
}

/// The `<Code>` and `<Message>` of an S3 error document, e.g. `AccessDenied: Access Denied`.
pub fn error_message(xml: &str) -> Option<String> {
	let code = tag_values(xml, "Code").next()?;
	Some(match tag_values(xml, "Message").next() {
		Some(message) => format!("{}: {}", unescape(code), unescape(message)),
		None => unescape(code),
	})
}

/// Iterates over the text of every `<tag>...</tag>` element.
fn tag_values<'a>(xml: &'a str, tag: &str) -> impl Iterator<Item = &'a str> {
	let start_tag = format!("<{tag}>");
	let end_tag = format!("</{tag}>");
	let mut rest = xml;
	std::iter::from_fn(move || {
		let start = rest.find(&start_tag)? + start_tag.len();
		let len = rest[start..].find(&end_tag)?;
		let value = &rest[start..start + len];
		rest = &rest[start + len + end_tag.len()..];
		Some(value)
	})
}

fn unescape(text: &str) -> String {
	text
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&apos;", "'")
		.replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn parses_truncated_page() {
		let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
	<Name>bucket</Name><Prefix>graphs/</Prefix><KeyCount>2</KeyCount>
	<IsTruncated>true</IsTruncated>
	<Contents><Key>graphs/A_drive.graphml</Key><Size>12</Size></Contents>
	<Contents><Key>graphs/Tom&amp;Jerry_walk.graphml</Key><Size>7</Size></Contents>
	<NextContinuationToken>token/2=</NextContinuationToken>
</ListBucketResult>"#;
		assert_eq!(
			ListPage::parse(xml),
			ListPage {
				keys: vec![
					"graphs/A_drive.graphml".to_string(),
					"graphs/Tom&Jerry_walk.graphml".to_string()
				],
				next_token: Some("token/2=".to_string()),
			}
		);
	}

	#[test]
	fn parses_last_page() {
		let xml = "<ListBucketResult><IsTruncated>false</IsTruncated></ListBucketResult>";
		assert_eq!(ListPage::parse(xml), ListPage::default());
	}

	#[test]
	fn extracts_error_message() {
		let xml = "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>";
		assert_eq!(error_message(xml).as_deref(), Some("AccessDenied: Access Denied"));
		assert_eq!(error_message("<Error><Code>NoSuchBucket</Code></Error>").as_deref(), Some("NoSuchBucket"));
		assert_eq!(error_message("not xml"), None);
	}
}

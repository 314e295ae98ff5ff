//! [`RowReader`]: a pull-based iterator of typed rows.
//!
//! Pipeline:
//!   BufRead
//!     └─ quick_xml::Reader::read_event_into() → Event
//!          └─ collect_attrs()                 → RowAttrs
//!               └─ T::from_row()              → T

use std::{io::BufRead, marker::PhantomData};

use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};
use sedump_core::{Entity, FromRow, ROW_TAG, RowAttrs};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  /// Before the container start tag.
  Prolog,
  /// Inside the container.
  Rows,
  /// Container closed, or an error was returned.
  Done,
}

/// Lazily decodes `<row/>` elements of one container into records of type
/// `T`.
///
/// The iterator is finite and fused: it ends at the container's end tag and
/// yields nothing after the first error. It cannot be rewound; decoding again
/// needs a fresh reader. Only one row's attributes are held at a time.
pub struct RowReader<R, T> {
  reader: Reader<R>,
  root:   String,
  row:    String,
  state:  State,
  rows:   u64,
  buf:    Vec<u8>,
  skip:   Vec<u8>,
  attrs:  RowAttrs,
  _out:   PhantomData<fn() -> T>,
}

/// Decode rows of `T` from `reader`, checking the container is `root_tag` and
/// every element inside it is `row_tag`.
pub fn decode_rows<R: BufRead, T: FromRow>(
  reader: R,
  root_tag: &str,
  row_tag: &str,
) -> RowReader<R, T> {
  RowReader::new(reader, root_tag, row_tag)
}

impl<R: BufRead, T: FromRow> RowReader<R, T> {
  pub fn new(reader: R, root_tag: impl Into<String>, row_tag: impl Into<String>) -> Self {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);

    Self {
      reader,
      root: root_tag.into(),
      row: row_tag.into(),
      state: State::Prolog,
      rows: 0,
      buf: Vec::with_capacity(8192),
      skip: Vec::new(),
      attrs: RowAttrs::new(),
      _out: PhantomData,
    }
  }

  /// Number of rows decoded successfully so far.
  pub fn rows_read(&self) -> u64 { self.rows }

  fn step(&mut self) -> Result<Option<T>> {
    loop {
      if self.state == State::Done {
        return Ok(None);
      }

      let ordinal = self.rows + 1;
      self.buf.clear();
      let event = self
        .reader
        .read_event_into(&mut self.buf)
        .map_err(|e| Error::from_xml(ordinal, e))?;

      match (self.state, event) {
        (State::Prolog, Event::Start(e)) => {
          expect_name(&e, &self.root, 0)?;
          self.state = State::Rows;
        }
        (State::Prolog, Event::Empty(e)) => {
          // `<users/>`: a container with no rows.
          expect_name(&e, &self.root, 0)?;
          self.state = State::Done;
          return Ok(None);
        }
        (State::Prolog, Event::End(e)) => {
          return Err(Error::structure(
            0,
            format!("unexpected </{}>", String::from_utf8_lossy(e.name().as_ref())),
          ));
        }
        (State::Prolog, Event::Eof) => {
          return Err(Error::structure(0, format!("no <{}> element", self.root)));
        }
        (State::Rows, Event::Empty(e)) => {
          expect_name(&e, &self.row, ordinal)?;
          let record = decode_row(&e, &mut self.attrs, ordinal)?;
          self.rows = ordinal;
          return Ok(Some(record));
        }
        (State::Rows, Event::Start(e)) => {
          expect_name(&e, &self.row, ordinal)?;
          let record = decode_row(&e, &mut self.attrs, ordinal)?;
          self
            .reader
            .read_to_end_into(e.name(), &mut self.skip)
            .map_err(|err| Error::from_xml(ordinal, err))?;
          self.skip.clear();
          self.rows = ordinal;
          return Ok(Some(record));
        }
        (State::Rows, Event::End(e)) => {
          if e.name().as_ref() != self.root.as_bytes() {
            return Err(Error::structure(
              ordinal,
              format!("unexpected </{}>", String::from_utf8_lossy(e.name().as_ref())),
            ));
          }
          tracing::trace!(root = %self.root, rows = self.rows, "container closed");
          self.state = State::Done;
          return Ok(None);
        }
        (State::Rows, Event::Eof) => {
          return Err(Error::structure(
            ordinal,
            format!("document ended before </{}>", self.root),
          ));
        }
        // Declarations, comments, processing instructions, doctype, text.
        _ => {}
      }
    }
  }
}

impl<R: BufRead, T: Entity> RowReader<R, T> {
  /// A reader expecting `T`'s container tag and `<row/>` elements.
  pub fn for_entity(reader: R) -> Self {
    Self::new(reader, T::KIND.root_tag(), ROW_TAG)
  }
}

impl<R: BufRead, T: FromRow> Iterator for RowReader<R, T> {
  type Item = Result<T>;

  fn next(&mut self) -> Option<Self::Item> {
    match self.step() {
      Ok(Some(record)) => Some(Ok(record)),
      Ok(None) => None,
      Err(e) => {
        self.state = State::Done;
        Some(Err(e))
      }
    }
  }
}

impl<R: BufRead, T: FromRow> std::iter::FusedIterator for RowReader<R, T> {}

fn expect_name(start: &BytesStart<'_>, expected: &str, row: u64) -> Result<()> {
  let name = start.name();
  if name.as_ref() == expected.as_bytes() {
    return Ok(());
  }
  Err(Error::structure(
    row,
    format!(
      "expected <{expected}>, found <{}>",
      String::from_utf8_lossy(name.as_ref())
    ),
  ))
}

fn decode_row<T: FromRow>(start: &BytesStart<'_>, attrs: &mut RowAttrs, row: u64) -> Result<T> {
  attrs.clear();
  for attr in start.attributes() {
    let attr = attr.map_err(|e| Error::structure(row, e.to_string()))?;
    let key = std::str::from_utf8(attr.key.as_ref())
      .map_err(|e| Error::structure(row, format!("attribute name: {e}")))?;
    let value = attr
      .unescape_value()
      .map_err(|e| Error::from_xml(row, e))?;
    attrs.push(key, value);
  }
  T::from_row(attrs).map_err(|source| Error::Field { row, source })
}

#[cfg(test)]
mod tests {
  use std::io::{self, BufReader, Read};

  use sedump_core::{Tag, User};

  use super::*;

  const USERS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<users>
  <row Id="-1" Reputation="1" CreationDate="2014-05-13T21:29:22.820" DisplayName="Community" LastAccessDate="2014-05-13T21:29:22.820" WebsiteUrl="http://meta.stackexchange.com/" Location="on the server farm" AboutMe="&lt;p&gt;Hi&lt;/p&gt;" Views="0" UpVotes="1" DownVotes="2" AccountId="-1" />
  <row Id="1" Reputation="101" CreationDate="2014-05-13T22:58:54.810" DisplayName="Adam" LastAccessDate="2014-05-20T02:56:46.207" Views="7" UpVotes="0" DownVotes="0" WebsiteUrl="" AccountId="4235" />
</users>"#;

  fn users(xml: &str) -> RowReader<&[u8], User> { RowReader::for_entity(xml.as_bytes()) }

  #[test]
  fn decodes_all_rows_in_order() {
    let rows: Vec<User> = users(USERS).collect::<Result<_>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, -1);
    assert_eq!(rows[1].id, 1);
    assert_eq!(rows[0].about_me.as_deref(), Some("<p>Hi</p>"));
  }

  #[test]
  fn absent_and_empty_website_url() {
    let xml = r#"<users>
      <row Id="1" Reputation="1" CreationDate="2014-05-13T21:29:22.820" LastAccessDate="2014-05-13T21:29:22.820" Views="0" UpVotes="0" DownVotes="0" />
      <row Id="2" Reputation="1" CreationDate="2014-05-13T21:29:22.820" LastAccessDate="2014-05-13T21:29:22.820" Views="0" UpVotes="0" DownVotes="0" WebsiteUrl="" />
    </users>"#;
    let rows: Vec<User> = users(xml).collect::<Result<_>>().unwrap();
    assert_eq!(rows[0].website_url, None);
    assert_eq!(rows[1].website_url, Some(String::new()));
  }

  #[test]
  fn wrong_root_is_rejected_before_any_row() {
    let xml = USERS.replace("<users>", "<posts>").replace("</users>", "</posts>");
    let mut reader = users(&xml);
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(err, Error::Structure { row: 0, .. }), "{err:?}");
    assert_eq!(reader.rows_read(), 0);
    assert!(reader.next().is_none());
  }

  #[test]
  fn wrong_inner_element_is_rejected() {
    let xml = r#"<users><user Id="1" /></users>"#;
    let err = users(xml).next().unwrap().unwrap_err();
    assert!(matches!(err, Error::Structure { row: 1, .. }), "{err:?}");
  }

  #[test]
  fn truncated_document_is_a_structure_error() {
    let cut = USERS.find("</users>").unwrap();
    let results: Vec<_> = users(&USERS[..cut]).collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(Error::Structure { row: 3, .. })));
  }

  #[test]
  fn empty_containers_yield_nothing() {
    assert_eq!(users("<users/>").count(), 0);
    assert_eq!(users("<?xml version=\"1.0\"?>\n<users>\n</users>").count(), 0);
  }

  #[test]
  fn empty_document_is_a_structure_error() {
    let err = users("").next().unwrap().unwrap_err();
    assert!(matches!(err, Error::Structure { row: 0, .. }));
  }

  #[test]
  fn field_error_names_field_and_row() {
    let xml = USERS.replace(r#"CreationDate="2014-05-13T22:58:54.810""#, r#"CreationDate="2014-05-13""#);
    let mut reader = users(&xml);
    assert!(reader.next().unwrap().is_ok());
    match reader.next().unwrap().unwrap_err() {
      Error::Field { row, source } => {
        assert_eq!(row, 2);
        assert_eq!(source.field(), "CreationDate");
      }
      other => panic!("unexpected {other:?}"),
    }
    assert!(reader.next().is_none(), "reader must be fused after an error");
  }

  #[test]
  fn non_self_closing_row_is_accepted() {
    let xml = r#"<tags><row Id="1" TagName="rust" Count="3">ignored<b/></row><row Id="2" TagName="go" Count="1"/></tags>"#;
    let tags: Vec<Tag> = RowReader::for_entity(xml.as_bytes())
      .collect::<Result<_>>()
      .unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1].tag_name, "go");
  }

  #[test]
  fn comments_before_root_are_skipped() {
    let xml = "<!-- dump --><tags><!-- none --></tags>";
    assert_eq!(RowReader::<_, Tag>::for_entity(xml.as_bytes()).count(), 0);
  }

  #[test]
  fn custom_tag_names() {
    let xml = r#"<list><item Id="4" TagName="c" Count="0" /></list>"#;
    let tags: Vec<Tag> = decode_rows(xml.as_bytes(), "list", "item")
      .collect::<Result<_>>()
      .unwrap();
    assert_eq!(tags[0].id, 4);
  }

  struct FailAfter<'a> {
    data:  &'a [u8],
    limit: usize,
  }

  impl Read for FailAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
      if self.limit == 0 {
        return Err(io::Error::other("archive stream broke"));
      }
      let n = buf.len().min(self.limit).min(self.data.len());
      buf[..n].copy_from_slice(&self.data[..n]);
      self.data = &self.data[n..];
      self.limit -= n;
      Ok(n)
    }
  }

  #[test]
  fn io_failure_surfaces_as_read_error() {
    let stream = FailAfter { data: USERS.as_bytes(), limit: 200 };
    let reader: RowReader<_, User> = RowReader::for_entity(BufReader::with_capacity(16, stream));
    let last = reader.last().unwrap();
    assert!(matches!(last, Err(Error::Read { .. })), "{last:?}");
  }
}

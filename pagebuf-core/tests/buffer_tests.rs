//! Integration tests for the buffer API: ingest, peek, drain, space,
//! contiguation, search.

use pagebuf_core::{Buffer, Error};

const EARTH: &[u8] = b"Earth";
const VS: &[u8] = b"Vs.";
const SOUP: &[u8] = b"Soup";

fn readonly_buffer(parts: &[&'static [u8]]) -> Buffer {
    let mut buf = Buffer::new();
    for part in parts {
        buf.add_readonly(part).unwrap();
    }
    buf
}

fn collected(buf: &Buffer) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in buf.peek_all() {
        out.extend_from_slice(chunk);
    }
    out
}

#[test]
fn new_buffer_is_empty() {
    let buf = Buffer::new();
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert_eq!(buf.space_len(), 0);
    assert_eq!(buf.peek_all().count(), 0);
}

#[test]
fn unmanaged_buffer_writes_into_the_caller_slab() {
    let slab: &'static mut [u8] = Box::leak(vec![0u8; 32].into_boxed_slice());
    let slab_ptr = slab.as_ptr();
    let mut buf = Buffer::with_unmanaged(slab);
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.space_len(), 32);

    buf.add(b"Hello There!").unwrap();
    let chunks: Vec<&[u8]> = buf.peek_all().collect();
    assert_eq!(chunks, [&b"Hello There!"[..]]);
    assert!(std::ptr::eq(chunks[0].as_ptr(), slab_ptr));
    assert_eq!(buf.space_len(), 32 - 12);
}

#[test]
fn readonly_pages_never_offer_space() {
    let mut buf = Buffer::new();
    buf.add_readonly(b"Hello, ").unwrap();
    assert_eq!(buf.len(), 7);
    assert_eq!(buf.space_len(), 0);

    buf.add_readonly(b"World!").unwrap();
    assert_eq!(buf.len(), 13);
    assert_eq!(buf.space_len(), 0);
    assert_eq!(buf.peek_all().count(), 2);
}

#[test]
fn add_after_readonly_starts_a_fresh_page() {
    const GREETING: &[u8] = b"Hello ";
    let copied = *b"There";

    let mut buf = Buffer::new();
    buf.add_readonly(GREETING).unwrap();
    buf.add(&copied).unwrap();

    let chunks: Vec<&[u8]> = buf.peek_all().collect();
    assert_eq!(chunks, [&b"Hello "[..], &b"There"[..]]);
    assert!(std::ptr::eq(chunks[0].as_ptr(), GREETING.as_ptr()));
    assert!(!std::ptr::eq(chunks[1].as_ptr(), copied.as_ptr()));
}

#[test]
fn peek_counts_only_needed_pages() {
    let buf = readonly_buffer(&[b"Hello", b"World"]);

    assert_eq!(buf.peek(5).count(), 1);
    assert_eq!(buf.peek(6).count(), 2);
    assert_eq!(buf.peek(10).count(), 2);
    assert_eq!(buf.peek(11).count(), 2);
    assert_eq!(buf.peek_all().count(), 2);

    let chunks: Vec<&[u8]> = buf.peek(6).collect();
    assert_eq!(chunks, [&b"Hello"[..], &b"W"[..]]);
}

#[test]
fn peek_all_equals_bytes_removed() {
    let mut buf = readonly_buffer(&[EARTH, VS, SOUP]);
    let via_peek = collected(&buf);

    let mut via_remove = vec![0u8; buf.len()];
    assert_eq!(buf.remove(&mut via_remove), via_peek.len());
    assert_eq!(via_peek, via_remove);
    assert!(buf.is_empty());
}

#[test]
fn add_then_copy_out_round_trips() {
    let mut buf = Buffer::new();
    buf.add(b"0123456789").unwrap();

    let mut out = [0u8; 10];
    assert_eq!(buf.copy_out(&mut out), 10);
    assert_eq!(&out, b"0123456789");
    assert_eq!(buf.len(), 10);
}

#[test]
fn copy_out_leaves_the_buffer_unchanged() {
    let buf = readonly_buffer(&[EARTH, VS, SOUP]);
    let len = buf.len();
    let pages = buf.peek_all().count();

    let mut some = [0u8; 6];
    assert_eq!(buf.copy_out(&mut some), 6);
    assert_eq!(&some, b"EarthV");

    let mut all = vec![0u8; 64];
    assert_eq!(buf.copy_out(&mut all), len);
    assert_eq!(&all[..len], b"EarthVs.Soup");

    assert_eq!(buf.copy_out(&mut []), 0);
    assert_eq!(buf.len(), len);
    assert_eq!(buf.peek_all().count(), pages);
}

#[test]
fn copy_out_from_an_offset() {
    let buf = readonly_buffer(&[EARTH, VS, SOUP]);
    let mut out = [0u8; 5];
    assert_eq!(buf.copy_out_from(4, &mut out), 5);
    assert_eq!(&out, b"hVs.S");
}

#[test]
fn two_page_join_takes_to_one_string() {
    let mut buf = readonly_buffer(&[b"Hello", b"World"]);
    let chunks: Vec<&[u8]> = buf.peek_all().collect();
    assert_eq!(chunks, [&b"Hello"[..], &b"World"[..]]);
    assert_eq!(buf.len(), 10);

    let joined = buf.take_string().unwrap();
    assert_eq!(joined, "HelloWorld");
    assert!(buf.is_empty());
}

#[test]
fn take_string_of_empty_buffer_is_empty() {
    let mut buf = Buffer::new();
    assert_eq!(buf.take_string().unwrap(), "");
    assert!(buf.is_empty());
}

#[test]
fn take_string_rejects_invalid_utf8() {
    let mut buf = Buffer::new();
    buf.add(&[0xFF, 0xFE]).unwrap();
    assert!(matches!(buf.take_string(), Err(Error::Utf8(_))));
}

#[test]
fn pagebreak_splits_subsequent_appends() {
    let mut buf = Buffer::new();
    buf.add(b"one").unwrap();
    buf.add_pagebreak().unwrap();
    buf.add(b"two").unwrap();

    let chunks: Vec<&[u8]> = buf.peek_all().collect();
    assert_eq!(chunks, [&b"one"[..], &b"two"[..]]);
}

#[test]
fn make_contiguous_collapses_readonly_pages() {
    let mut buf = readonly_buffer(&[EARTH, VS]);
    let expected = b"EarthVs.";

    let head = buf.make_all_contiguous().unwrap();
    assert_eq!(head, expected);
    assert!(!std::ptr::eq(head.as_ptr(), EARTH.as_ptr()));
    assert_eq!(buf.peek_all().count(), 1);
    assert_eq!(buf.len(), expected.len());
}

#[test]
fn make_contiguous_fast_path_returns_the_same_pointer() {
    let mut buf = readonly_buffer(&[EARTH, VS, SOUP]);
    for _ in 0..EARTH.len() {
        let head = buf.make_contiguous(EARTH.len()).unwrap();
        assert!(std::ptr::eq(head.as_ptr(), EARTH.as_ptr()));
        assert_eq!(buf.peek_all().count(), 3);
        assert_eq!(buf.len(), 12);
    }
}

#[test]
fn make_contiguous_preserves_content() {
    let mut buf = readonly_buffer(&[
        b"abcdefghijklmnopqrstuvwxyz",
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ*",
        b"0123456789!@#$%^&*()_",
    ]);
    let before = collected(&buf);
    let n = before.len() - 1;

    let head = buf.make_contiguous(n).unwrap();
    assert_eq!(head, &before[..n]);

    let lengths: Vec<usize> = buf.peek_all().map(<[u8]>::len).collect();
    assert_eq!(lengths, [n, 1]);
    assert_eq!(buf.len(), before.len());
    assert_eq!(collected(&buf), before);
}

#[test]
fn search_across_pages() {
    let buf = readonly_buffer(&[
        b"The Beat",
        b" were not the same band as T",
        b"he Beatles",
    ]);
    assert_eq!(buf.search(b"The Beatles"), Some(35));
    assert_eq!(buf.search(b"Beatles?"), None);
}

#[test]
fn search_range_respects_bounds() {
    let buf = readonly_buffer(&[b"Hungry Hungry ", b"Hungry Hippos"]);
    assert_eq!(buf.search(b"Hungry Hungry Hippos"), Some(7));
    assert_eq!(buf.search_range(8..27, b"Hungry Hungry Hippos"), None);
    assert_eq!(buf.search_range(7..26, b"Hungry Hungry Hippos"), None);
}

#[test]
fn reserve_commit_appends_without_copying_twice() {
    let mut buf = Buffer::new();
    buf.add(b"header:").unwrap();

    let space = buf.reserve_space(5).unwrap();
    assert_eq!(space.len(), 5);
    space.copy_from_slice(b"value");
    buf.commit_space(5);

    assert_eq!(buf.take_string().unwrap(), "header:value");
}

#[test]
fn commit_space_may_commit_less_than_reserved() {
    let mut buf = Buffer::new();
    let space = buf.reserve_space(128).unwrap();
    space[..2].copy_from_slice(b"ok");
    buf.commit_space(2);
    assert_eq!(buf.len(), 2);

    buf.commit_space(0);
    assert_eq!(buf.len(), 2);
}

#[test]
fn peek_space_exposes_the_free_region() {
    let slab: &'static mut [u8] = Box::leak(vec![0u8; 16].into_boxed_slice());
    let mut buf = Buffer::with_unmanaged(slab);
    buf.add(b"abc").unwrap();

    let space = buf.peek_space();
    assert_eq!(space.len(), 13);
    space[0] = b'd';
    buf.commit_space(1);
    assert_eq!(buf.len(), 4);
    assert_eq!(collected(&buf), b"abcd");
}

#[test]
fn vectored_view_matches_pages() {
    use std::io::IoSlice;

    let buf = readonly_buffer(&[EARTH, VS, SOUP]);
    let mut slices = [IoSlice::new(&[]); 2];
    // reports the needed count even when dst is short
    assert_eq!(buf.peek_vectored(&mut slices), 3);
    assert_eq!(&*slices[0], EARTH);
    assert_eq!(&*slices[1], VS);
}

#[test]
fn buffer_from_vec_and_bytes() {
    let buf = Buffer::from(b"static".as_slice());
    assert_eq!(buf.len(), 6);

    let mut buf = Buffer::from(vec![1u8, 2, 3]);
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.take_vec(), [1, 2, 3]);

    let buf = Buffer::from(bytes::Bytes::from_static(b"shared"));
    assert_eq!(collected(&buf), b"shared");
}

#[test]
fn content_survives_heavy_mixed_traffic() {
    let mut buf = Buffer::new();
    let mut shadow: Vec<u8> = Vec::new();

    for round in 0..200usize {
        let chunk = vec![(round % 251) as u8; round % 37 + 1];
        buf.add(&chunk).unwrap();
        shadow.extend_from_slice(&chunk);

        if round % 3 == 0 {
            buf.add_readonly(b"--mark--").unwrap();
            shadow.extend_from_slice(b"--mark--");
        }
        if round % 5 == 0 {
            let n = round % 17;
            let mut out = vec![0u8; n];
            let removed = buf.remove(&mut out);
            assert_eq!(out[..removed], shadow[..removed]);
            shadow.drain(..removed);
        }
    }

    assert_eq!(buf.len(), shadow.len());
    assert_eq!(collected(&buf), shadow);
}

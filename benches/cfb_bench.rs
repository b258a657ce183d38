use criterion::{criterion_group, criterion_main, Criterion};

use cfbfs::prelude::*;
use zerocopy::IntoBytes;

criterion_group!(benches, cfb_component_bench);
criterion_main!(benches);

const SECTOR: usize = 512;

fn entry(name: &str, object_type: u8, right: u32, child: u32, start: u32, size: u64) -> CfbEntry {
    let mut units = [0u16; 32];
    let mut count = 0usize;
    for (i, unit) in name.encode_utf16().enumerate() {
        units[i] = unit;
        count = i + 1;
    }
    CfbEntry {
        name: units,
        name_len: ((count + 1) * 2) as u16,
        object_type,
        color_flag: 1,
        left_sibling_id: CFB_NO_STREAM,
        right_sibling_id: right,
        child_id: child,
        clsid: [0u8; 16],
        state_bits: 0,
        creation_time: 0,
        modified_time: 0,
        start_sector_location: start,
        stream_size: size,
    }
}

/// One 64 KiB regular-path stream plus one 2000-byte mini-path stream.
/// FAT in sector 0, directory in 1, MiniFAT in 2, mini stream in 3-6,
/// "Big" in 7-134.
fn build_image() -> Vec<u8> {
    let mut img = vec![0u8; SECTOR * 136];

    let mut difat = [CFB_FREE_SECTOR; 109];
    difat[0] = 0;
    let header = CfbHeader {
        signature: CFB_SIGNATURE,
        clsid: [0u8; 16],
        minor_version: CFB_MINOR_VERSION,
        major_version: CFB_MAJOR_VERSION_3,
        byte_order: CFB_BYTE_ORDER_MARK,
        sector_shift: CFB_SECTOR_SHIFT_V3,
        mini_sector_shift: CFB_MINI_SECTOR_SHIFT,
        reserved: [0u8; 6],
        num_directory_sectors: 0,
        num_fat_sectors: 1,
        first_directory_sector: 1,
        transaction_signature: 0,
        mini_stream_cutoff: 4096,
        first_mini_fat_sector: 2,
        num_mini_fat_sectors: 1,
        first_difat_sector: CFB_END_OF_CHAIN,
        num_difat_sectors: 0,
        difat,
    };
    img[..512].copy_from_slice(header.as_bytes());

    let word = |img: &mut [u8], sector: usize, slot: usize, value: u32| {
        let at = (sector + 1) * SECTOR + slot * 4;
        img[at..at + 4].copy_from_slice(&value.to_le_bytes());
    };

    for slot in 0..SECTOR / 4 {
        word(&mut img, 0, slot, CFB_FREE_SECTOR);
        word(&mut img, 2, slot, CFB_FREE_SECTOR);
    }
    word(&mut img, 0, 0, CFB_FAT_SECTOR);
    word(&mut img, 0, 1, CFB_END_OF_CHAIN); // directory
    word(&mut img, 0, 2, CFB_END_OF_CHAIN); // MiniFAT
    for sector in 3..6 {
        word(&mut img, 0, sector, sector as u32 + 1); // mini stream: 3..=6
    }
    word(&mut img, 0, 6, CFB_END_OF_CHAIN);
    for sector in 7..134 {
        word(&mut img, 0, sector, sector as u32 + 1); // Big: 7..=134
    }
    word(&mut img, 0, 134, CFB_END_OF_CHAIN);

    for mini in 0..31 {
        word(&mut img, 2, mini, mini as u32 + 1); // Small: minis 0..=31
    }
    word(&mut img, 2, 31, CFB_END_OF_CHAIN);

    let no = CFB_NO_STREAM;
    let put_entry = |img: &mut [u8], index: usize, e: &CfbEntry| {
        let at = 2 * SECTOR + index * 128;
        img[at..at + 128].copy_from_slice(e.as_bytes());
    };
    put_entry(&mut img, 0, &entry("Root Entry", CFB_ENTRY_ROOT_STORAGE, no, 1, 3, 2048));
    put_entry(&mut img, 1, &entry("Big", CFB_ENTRY_STREAM, 2, no, 7, 65536));
    put_entry(&mut img, 2, &entry("Small", CFB_ENTRY_STREAM, no, no, 0, 2000));

    for (i, byte) in img[4 * SECTOR..].iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }

    img
}

pub fn cfb_component_bench(c: &mut Criterion) {
    let img = build_image();

    c.bench_function("cfb_read", |b| {
        b.iter(|| {
            let mut file = CfbReader::new();
            file.read(&img).expect("read failed");
        });
    });

    let mut file = CfbReader::new();
    file.read(&img).expect("read failed");
    let big = file.find_entry("Big").expect("find failed").expect("Big missing");
    let small = file.find_entry("Small").expect("find failed").expect("Small missing");

    c.bench_function("cfb_read_stream_regular", |b| {
        b.iter(|| file.read_stream(big).expect("read_stream failed"));
    });

    c.bench_function("cfb_read_stream_mini", |b| {
        b.iter(|| file.read_stream(small).expect("read_stream failed"));
    });

    c.bench_function("cfb_iterate_all", |b| {
        b.iter(|| {
            let mut count = 0usize;
            file.iterate_all(|_, _| count += 1).expect("iterate failed");
            count
        });
    });
}

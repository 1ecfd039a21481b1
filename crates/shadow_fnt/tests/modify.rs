mod common;

use pretty_assertions::assert_eq;
use shadow_fnt::error::{Error, Result};
use shadow_fnt::{decode, EntryType, FntTable};
use tracing_test::traced_test;

use common::*;

fn keys(fnt: &FntTable) -> Vec<i32> {
    fnt.iter().map(|e| e.message_id_branch_sequence).collect()
}

#[traced_test]
#[test]
fn delete_entry() -> Result<()> {
    let mut fnt = decode(&stage_bytes())?;
    let original = fnt.clone();

    let removed = fnt.delete_entry(CAGE_INDEX)?;
    assert_eq!(removed.subtitle(), CAGE_SUBTITLE);
    assert_eq!(fnt.entry_count(), ENTRY_COUNT - 1);

    let next = original.get_entry(CAGE_INDEX + 1)?;
    let moved = fnt.get_entry(CAGE_INDEX)?;
    assert_eq!(moved.subtitle(), next.subtitle());
    assert_eq!(moved.message_id_branch_sequence, next.message_id_branch_sequence);
    assert_eq!(moved.entry_type, next.entry_type);
    assert_eq!(moved.subtitle_active_time, next.subtitle_active_time);
    assert_eq!(moved.audio_id, next.audio_id);
    assert!(moved.subtitle_address < next.subtitle_address);

    assert!(fnt.iter().all(|e| e.subtitle_address != CAGE_ADDRESS
        && e.subtitle() != CAGE_SUBTITLE
        && e.message_id_branch_sequence != CAGE_KEY
        && e.audio_id != CAGE_AUDIO));

    assert!(fnt.is_consistent());

    Ok(())
}

#[test]
fn delete_entry_shifts_by_record_and_subtitle() -> Result<()> {
    let mut fnt = stage_table();
    let original = fnt.clone();

    let removed = fnt.delete_entry(CAGE_INDEX)?;
    let shift = 20 + removed.subtitle_byte_len();

    for index in 0..CAGE_INDEX {
        let before = original.get_entry(index)?;
        let after = fnt.get_entry(index)?;
        assert_eq!(after.subtitle_address, before.subtitle_address - 20);
        assert_eq!(after.subtitle(), before.subtitle());
        assert_eq!(after.message_id_branch_sequence, before.message_id_branch_sequence);
    }

    for index in CAGE_INDEX..fnt.entry_count() {
        assert_eq!(
            fnt.subtitle_address(index)?,
            original.subtitle_address(index + 1)? - shift
        );
    }

    Ok(())
}

#[traced_test]
#[test]
fn insert_entry() -> Result<()> {
    let mut fnt = stage_table();

    let index = fnt.insert_entry(CAGE_KEY + 15)?;
    assert_eq!(index, CAGE_INDEX + 1);
    assert_eq!(fnt.entry_count(), ENTRY_COUNT + 1);
    assert_eq!(fnt.message_id_branch_sequence(CAGE_INDEX)?, CAGE_KEY);
    assert_eq!(fnt.message_id_branch_sequence(CAGE_INDEX + 1)?, CAGE_KEY + 15);
    assert_eq!(fnt.message_id_branch_sequence(CAGE_INDEX + 2)?, CAGE_KEY + 30);

    let inserted = fnt.get_entry(index)?;
    assert_eq!(inserted.subtitle(), "\0");
    assert_eq!(inserted.entry_type, EntryType::TriggerObject);
    assert_eq!(inserted.audio_id, -1);

    assert!(fnt.is_consistent());
    assert!(keys(&fnt).windows(2).all(|w| w[0] < w[1]));

    Ok(())
}

#[test]
fn insert_duplicate_entry() {
    let mut fnt = stage_table();
    let original = fnt.clone();

    assert!(matches!(
        fnt.insert_entry(CAGE_KEY),
        Err(Error::DuplicateKey(CAGE_KEY))
    ));
    assert_eq!(fnt, original);
}

#[test]
fn insert_after_last_entry() -> Result<()> {
    let mut fnt = stage_table();
    let last = *keys(&fnt).last().unwrap();

    assert!(matches!(fnt.insert_entry(last + 1), Err(Error::NoSuccessor(_))));
    assert_eq!(fnt.append_entry(last + 1)?, ENTRY_COUNT);
    assert!(fnt.is_consistent());

    Ok(())
}

#[traced_test]
#[test]
fn set_subtitle() -> Result<()> {
    let mut fnt = stage_table();
    let original = fnt.clone();

    fnt.set_subtitle(CAGE_INDEX, "This cage is protected by\r\nthose GUN soldiers.\0\0Destroy them!")?;
    assert_eq!(
        fnt.subtitle(CAGE_INDEX)?,
        "This cage is protected by\nthose GUN soldiers.Destroy them!\0"
    );

    let grown = fnt.get_entry(CAGE_INDEX)?.subtitle_byte_len()
        - original.get_entry(CAGE_INDEX)?.subtitle_byte_len();
    assert_eq!(grown, 2 * "Destroy them!".len() as i32);

    assert_eq!(fnt.subtitle_address(CAGE_INDEX)?, CAGE_ADDRESS);
    assert_eq!(
        fnt.subtitle_address(CAGE_INDEX + 1)?,
        original.subtitle_address(CAGE_INDEX + 1)? + grown
    );
    assert!(fnt.is_consistent());

    let decoded = decode(&fnt.encode()?)?;
    assert_eq!(decoded, fnt);

    Ok(())
}

#[test]
fn mixed_edits_keep_addresses_consistent() -> Result<()> {
    let mut fnt = stage_table();

    fnt.set_subtitle(0, "")?;
    fnt.insert_entry(60500 + 15)?;
    fnt.delete_entry(300)?;
    fnt.set_subtitle(42, "Shadow! \u{1D11E} Over here!")?;
    fnt.insert_entry(CAGE_KEY - 1)?;
    fnt.delete_entry(fnt.entry_count() - 1)?;
    fnt.set_audio_id(5, -1)?;
    fnt.set_entry_type(6, EntryType::IdleVoice)?;

    assert!(fnt.is_consistent());

    let before = fnt.clone();
    fnt.recompute_all_addresses();
    assert_eq!(fnt, before);

    fnt.recompute_all_addresses();
    assert_eq!(fnt, before);

    Ok(())
}

#[test]
fn drifted_addresses_are_recomputed() -> Result<()> {
    let mut fnt = stage_table();

    for index in 50..60 {
        fnt.entry_mut(index)?.subtitle_address += 7;
    }
    assert_eq!(fnt.first_inconsistent_address(), Some(50));
    assert_ne!(fnt, stage_table());

    fnt.recompute_all_addresses();
    assert_eq!(fnt, stage_table());

    Ok(())
}

// End-to-end tests for corpus preparation
//
// Each test lays out a miniature Eval2000 corpus (SPHERE headers plus
// ISIP transcripts, optionally LDC2020T14 sentiment labels) in a temp
// directory and runs the whole pipeline over it.

use anyhow::Result;
use eval2000_prep::corpus::{SentimentError, RECORDINGS_FILE, SUPERVISIONS_FILE};
use eval2000_prep::{
    prepare_eval2000, Manifests, PrepareError, PrepareOptions, ValidationError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Corpus {
    _root: TempDir,
    audio_dir: PathBuf,
    transcripts_dir: PathBuf,
    sentiment_dir: PathBuf,
    output_dir: PathBuf,
}

impl Corpus {
    fn new() -> Result<Self> {
        let root = TempDir::new()?;
        let audio_dir = root.path().join("eval2000").join("english");
        let transcripts_dir = root.path().join("eval2000_trans").join("isip");
        let sentiment_dir = root.path().join("LDC2020T14");
        let output_dir = root.path().join("data").join("manifests");
        fs::create_dir_all(&audio_dir)?;
        fs::create_dir_all(&transcripts_dir)?;

        Ok(Self {
            _root: root,
            audio_dir,
            transcripts_dir,
            sentiment_dir,
            output_dir,
        })
    }

    /// Two-channel 8kHz SPHERE header of `seconds` duration
    fn add_audio(&self, id: &str, seconds: u64) -> Result<()> {
        let mut header = format!(
            "NIST_1A\n   1024\nsample_rate -i 8000\nchannel_count -i 2\nsample_count -i {}\nend_head\n",
            seconds * 8000
        );
        header.push_str(&" ".repeat(1024 - header.len()));
        fs::write(self.audio_dir.join(format!("{}.sph", id)), header)?;
        Ok(())
    }

    fn add_transcript(&self, name: &str, contents: &str) -> Result<()> {
        fs::write(self.transcripts_dir.join(name), contents)?;
        Ok(())
    }

    fn add_sentiment(&self, rows: &str) -> Result<()> {
        let data = self.sentiment_dir.join("data");
        fs::create_dir_all(&data)?;
        fs::write(data.join("sentiment_labels.tsv"), rows)?;
        Ok(())
    }

    fn prepare(&self, sentiment: bool, options: &PrepareOptions) -> Result<Manifests> {
        prepare_eval2000(
            &self.audio_dir,
            &self.transcripts_dir,
            sentiment.then_some(self.sentiment_dir.as_path()),
            Some(self.output_dir.as_path()),
            options,
        )
    }
}

fn standard_corpus() -> Result<Corpus> {
    let corpus = Corpus::new()?;
    corpus.add_audio("sw1000", 10)?;
    corpus.add_audio("en_4156", 10)?;
    corpus.add_transcript(
        "sw1000-isip.txt",
        "# sw1000\n1.0 2.5 A: hello there\n2.5 3.0 B: [silence]\n3.0 4.0 B: fine thanks\n",
    )?;
    corpus.add_transcript(
        "en_4156-isip.txt",
        "0.0 1.2 A: yeah\n1.2 9.5 B: i was saying that\n",
    )?;
    Ok(corpus)
}

fn segment_ids(manifests: &Manifests) -> Vec<&str> {
    manifests.supervisions.iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn test_prepare_builds_consistent_manifests() -> Result<()> {
    let corpus = standard_corpus()?;

    let manifests = corpus.prepare(false, &PrepareOptions::default())?;

    assert_eq!(manifests.recordings.len(), 2);
    assert_eq!(
        segment_ids(&manifests),
        vec!["en_4156_0", "en_4156_1", "sw1000_0", "sw1000_2"]
    );
    for segment in manifests.supervisions.iter() {
        assert!(
            manifests.recordings.contains(&segment.recording_id),
            "{} references unknown recording",
            segment.id
        );
    }

    let sw1000 = manifests.recordings.get("sw1000").unwrap();
    assert_eq!(sw1000.sources[0].source, "eval2000/english/sw1000.sph");
    assert_eq!(sw1000.duration, 10.0);

    let hello = manifests.supervisions.get("sw1000_0").unwrap();
    assert_eq!(hello.duration, 1.5);
    assert_eq!(hello.speaker, "sw1000_0_A");
    assert!(hello.custom.is_none());

    Ok(())
}

#[test]
fn test_prepare_keeps_silence_when_asked() -> Result<()> {
    let corpus = standard_corpus()?;
    let options = PrepareOptions {
        omit_silence: false,
        ..Default::default()
    };

    let manifests = corpus.prepare(false, &options)?;

    let silence = manifests.supervisions.get("sw1000_1").unwrap();
    assert_eq!(silence.text, "[silence]");
    assert_eq!(manifests.supervisions.len(), 5);

    Ok(())
}

#[test]
fn test_prepare_writes_and_reloads_manifests() -> Result<()> {
    let corpus = standard_corpus()?;

    let manifests = corpus.prepare(false, &PrepareOptions::default())?;

    let recordings_path = corpus.output_dir.join(RECORDINGS_FILE);
    let supervisions_path = corpus.output_dir.join(SUPERVISIONS_FILE);
    assert!(recordings_path.is_file());
    assert!(supervisions_path.is_file());

    let lines = fs::read_to_string(&supervisions_path)?;
    assert_eq!(lines.lines().count(), 4);
    let first: serde_json::Value = serde_json::from_str(lines.lines().next().unwrap())?;
    assert_eq!(first["id"], "en_4156_0");
    assert_eq!(first["language"], "English");
    assert!(first.get("custom").is_none());

    let reloaded = Manifests::load(&corpus.output_dir)?;
    assert_eq!(
        reloaded.recordings.iter().collect::<Vec<_>>(),
        manifests.recordings.iter().collect::<Vec<_>>()
    );
    assert_eq!(
        reloaded.supervisions.iter().collect::<Vec<_>>(),
        manifests.supervisions.iter().collect::<Vec<_>>()
    );

    // A second run over an existing output directory succeeds
    corpus.prepare(false, &PrepareOptions::default())?;

    Ok(())
}

#[test]
fn test_prepare_absolute_paths() -> Result<()> {
    let corpus = standard_corpus()?;
    let options = PrepareOptions {
        absolute_paths: true,
        ..Default::default()
    };

    let manifests = corpus.prepare(false, &options)?;

    let source = &manifests.recordings.get("sw1000").unwrap().sources[0].source;
    let expected = fs::canonicalize(corpus.audio_dir.join("sw1000.sph"))?;
    assert_eq!(Path::new(source), expected.as_path());

    Ok(())
}

#[test]
fn test_prepare_missing_transcript_is_fatal() -> Result<()> {
    let corpus = standard_corpus()?;
    corpus.add_audio("sw2000", 5)?;

    let err = corpus.prepare(false, &PrepareOptions::default()).unwrap_err();

    match err.downcast_ref::<PrepareError>() {
        Some(PrepareError::MissingTranscript { recording_id, .. }) => {
            assert_eq!(recording_id, "sw2000")
        }
        None => panic!("unexpected error: {:#}", err),
    }
    assert!(!corpus.output_dir.exists());

    Ok(())
}

#[test]
fn test_prepare_drops_recordings_without_segments() -> Result<()> {
    let corpus = standard_corpus()?;
    corpus.add_audio("sw3000", 5)?;
    corpus.add_transcript("sw3000-isip.txt", "0.0 5.0 A: [silence]\n")?;

    let manifests = corpus.prepare(false, &PrepareOptions::default())?;

    assert!(!manifests.recordings.contains("sw3000"));
    assert_eq!(manifests.recordings.len(), 2);

    Ok(())
}

#[test]
fn test_prepare_trims_segments_past_recording_end() -> Result<()> {
    let corpus = standard_corpus()?;
    corpus.add_audio("sw4000", 3)?;
    corpus.add_transcript("sw4000-isip.txt", "0.0 1.0 A: hi\n2.0 3.4 B: bye now\n")?;

    let manifests = corpus.prepare(false, &PrepareOptions::default())?;

    assert_eq!(manifests.supervisions.get("sw4000_1").unwrap().duration, 1.0);

    Ok(())
}

#[test]
fn test_prepare_negative_duration_fails_validation() -> Result<()> {
    let corpus = standard_corpus()?;
    corpus.add_audio("sw5000", 5)?;
    corpus.add_transcript("sw5000-isip.txt", "2.0 1.0 A: backwards\n")?;

    let err = corpus.prepare(false, &PrepareOptions::default()).unwrap_err();

    let validation = err
        .downcast_ref::<ValidationError>()
        .expect("validation error");
    assert_eq!(validation.problems.len(), 1);
    assert!(validation.problems[0].contains("sw5000_0"));

    Ok(())
}

#[test]
fn test_prepare_with_sentiment_labels() -> Result<()> {
    let corpus = standard_corpus()?;
    corpus.add_sentiment(
        "sw1000_A_0001\t1.0\t2.5\tpos#neu\n\
         sw1000_B_0002\t2.99\t4.0\tneg\n\
         sw1000_B_0003\t7.0\t8.0\tneu\n\
         sw9999_A_0001\t0.0\t1.0\tpos\n",
    )?;

    let manifests = corpus.prepare(true, &PrepareOptions::default())?;

    let hello = manifests.supervisions.get("sw1000_0").unwrap();
    assert_eq!(hello.custom_value("sentiment0"), Some("pos"));
    assert_eq!(hello.custom_value("sentiment1"), Some("neu"));

    let fine = manifests.supervisions.get("sw1000_2").unwrap();
    assert_eq!(fine.custom_value("sentiment0"), Some("neg"));
    assert_eq!(fine.custom.as_ref().unwrap().len(), 1);

    assert!(manifests.supervisions.get("en_4156_0").unwrap().custom.is_none());

    let written = fs::read_to_string(corpus.output_dir.join(SUPERVISIONS_FILE))?;
    assert!(written.contains(r#""custom":{"sentiment0":"pos","sentiment1":"neu"}"#));

    Ok(())
}

#[test]
fn test_prepare_missing_sentiment_labels_is_fatal() -> Result<()> {
    let corpus = standard_corpus()?;
    fs::create_dir_all(&corpus.sentiment_dir)?;

    let err = corpus.prepare(true, &PrepareOptions::default()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SentimentError>(),
        Some(SentimentError::MissingLabels(_))
    ));

    Ok(())
}

#[test]
fn test_prepare_missing_audio_dir() {
    let result = prepare_eval2000(
        "/nonexistent/eval2000",
        "/nonexistent/eval2000_trans",
        None,
        None,
        &PrepareOptions::default(),
    );
    assert!(result.is_err());
}

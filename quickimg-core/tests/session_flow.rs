use image::{DynamicImage, Rgb, RgbImage};
use quickimg_core::{ClipboardError, ClipboardService, EditorSession, SessionError, Snapshot};

#[derive(Default)]
struct FakeClipboard {
    image: Option<Snapshot>,
    fail_writes: bool,
}

impl ClipboardService for FakeClipboard {
    fn read_image(&mut self) -> Option<Snapshot> {
        self.image.clone()
    }

    fn write_image(&mut self, snapshot: &Snapshot) -> Result<(), ClipboardError> {
        if self.fail_writes {
            return Err(ClipboardError::Unavailable("locked".into()));
        }
        self.image = Some(snapshot.clone());
        Ok(())
    }
}

fn checker(width: u32, height: u32) -> Snapshot {
    let buf = RgbImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    Snapshot::new(DynamicImage::ImageRgb8(buf))
}

#[test]
fn clipboard_edit_copy_flow() {
    let mut clipboard = FakeClipboard {
        image: Some(checker(60, 30)),
        ..Default::default()
    };
    let mut session = EditorSession::new();

    session.load_from_clipboard(&mut clipboard).unwrap();
    session.grayscale().unwrap();
    session.preview_scale(50.0).unwrap();
    session.commit_scale().unwrap();
    session.copy_to_clipboard(&mut clipboard).unwrap();

    let copied = clipboard.image.unwrap();
    assert_eq!(copied.dimensions(), (30, 15));
    assert_eq!(session.history().len(), 3);
}

#[test]
fn empty_clipboard_keeps_current_image() {
    let mut clipboard = FakeClipboard::default();
    let mut session = EditorSession::new();
    session.load(checker(4, 4));

    let err = session.load_from_clipboard(&mut clipboard).unwrap_err();
    assert!(matches!(err, SessionError::ClipboardEmpty));
    assert_eq!(session.processed().unwrap().dimensions(), (4, 4));
}

#[test]
fn failed_copy_is_reported() {
    let mut clipboard = FakeClipboard {
        fail_writes: true,
        ..Default::default()
    };
    let mut session = EditorSession::new();
    session.load(checker(4, 4));

    let err = session.copy_to_clipboard(&mut clipboard).unwrap_err();
    assert!(matches!(err, SessionError::Clipboard(_)));
}

#[test]
fn save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    let mut session = EditorSession::new();
    session.load(checker(12, 8));
    session.resize(6, 4).unwrap();
    session.save_to(&path).unwrap();

    let mut reopened = EditorSession::new();
    reopened.open_file(&path).unwrap();
    assert_eq!(reopened.processed().unwrap().dimensions(), (6, 4));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = EditorSession::new();

    let err = session.open_file(dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, SessionError::Image(_)));
    assert!(!session.has_image());
}

#[test]
fn undo_past_history_window() {
    let mut session = EditorSession::with_history_capacity(3);
    session.load(checker(40, 40));
    for size in [30, 20, 10] {
        session.resize(size, size).unwrap();
    }

    // The loaded image has been evicted; only three edits remain.
    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(session.processed().unwrap().dimensions(), (30, 30));
}

use tui_bowling::core::{ConstantSource, GameState, SequenceSource};
use tui_bowling::term::{AdapterStatusView, AnchorY, FrameBuffer, ScoreboardView, Viewport};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            all.push(fb.get(x, y).unwrap().ch);
        }
        all.push('\n');
    }
    all
}

fn scripted(rolls: Vec<u8>) -> GameState {
    let mut gs = GameState::with_source(Box::new(SequenceSource::new(rolls)));
    gs.start();
    gs
}

#[test]
fn sheet_renders_border_corners_at_the_top_anchor() {
    let gs = scripted(vec![]);
    let snap = gs.snapshot();
    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);

    // Sheet is 70 wide; one player is three rows plus the header and border.
    let fb = view.render(&snap, Viewport::new(80, 24));
    assert_eq!(fb.get(5, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(74, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(5, 4).unwrap().ch, '└');
    assert_eq!(fb.get(74, 4).unwrap().ch, '┘');
}

#[test]
fn sheet_centers_vertically_by_default() {
    let gs = scripted(vec![]);
    let snap = gs.snapshot();
    let view = ScoreboardView::default();

    // start_y = (24 - (5 + 2)) / 2 = 8.
    let fb = view.render(&snap, Viewport::new(80, 24));
    assert_eq!(fb.get(5, 8).unwrap().ch, '┌');
}

#[test]
fn header_names_the_columns() {
    let gs = scripted(vec![]);
    let snap = gs.snapshot();
    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);

    let fb = view.render(&snap, Viewport::new(80, 24));
    let text = screen_text(&fb);
    assert!(text.contains("PLAYER"));
    assert!(text.contains("TOTAL"));
    // Frame number row: 1 sits at the first frame cell.
    assert_eq!(fb.get(17, 1).unwrap().ch, '1');
    assert_eq!(fb.get(22, 1).unwrap().ch, '2');
}

#[test]
fn rolls_render_with_bowling_glyphs() {
    // Strike frame, spare frame, gutter-open frame.
    let mut gs = scripted(vec![10, 0, 7, 3, 0, 4]);
    for _ in 0..6 {
        assert!(gs.advance());
    }
    let snap = gs.snapshot();
    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, Viewport::new(80, 24));

    // Player row is y=2; frame cells start at x=17 and step by 5.
    assert_eq!(fb.get(6, 2).unwrap().ch, '▶');
    assert_eq!(fb.get(7, 2).unwrap().ch, 'P');
    assert_eq!(fb.get(17, 2).unwrap().ch, 'X');
    assert_eq!(fb.get(19, 2).unwrap().ch, '-');
    assert_eq!(fb.get(22, 2).unwrap().ch, '7');
    assert_eq!(fb.get(24, 2).unwrap().ch, '/');
    assert_eq!(fb.get(27, 2).unwrap().ch, '-');
    assert_eq!(fb.get(29, 2).unwrap().ch, '4');
}

#[test]
fn frame_scores_render_under_the_rolls() {
    let mut gs = scripted(vec![10, 0, 7, 3, 0, 4]);
    for _ in 0..6 {
        assert!(gs.advance());
    }
    let snap = gs.snapshot();
    assert_eq!(snap.players[0].frames[0].score, 17);

    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, Viewport::new(80, 24));

    // Score row sits under the rolls row: 17 / 10 / 4 across the frames.
    // The spare's bonus reads the next first roll, a gutter, as zero.
    assert_eq!(fb.get(17, 3).unwrap().ch, '1');
    assert_eq!(fb.get(18, 3).unwrap().ch, '7');
    assert_eq!(fb.get(22, 3).unwrap().ch, '1');
    assert_eq!(fb.get(23, 3).unwrap().ch, '0');
    assert_eq!(fb.get(27, 3).unwrap().ch, '4');
    // Untouched frames show no score.
    assert_eq!(fb.get(32, 3).unwrap().ch, ' ');
}

#[test]
fn second_player_highlights_when_holding_the_lane() {
    let mut gs = GameState::with_source(Box::new(ConstantSource(5)));
    gs.start();
    gs.add_player();
    assert!(gs.advance());
    assert!(gs.advance());
    let snap = gs.snapshot();
    assert_eq!(snap.current_player, 1);

    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, Viewport::new(80, 24));

    // Two players: rows at y=2 and y=5. The marker follows the lane.
    assert_eq!(fb.get(6, 2).unwrap().ch, ' ');
    assert_eq!(fb.get(6, 5).unwrap().ch, '▶');
}

#[test]
fn finished_game_overlays_game_over_and_the_leader() {
    let mut gs = GameState::with_source(Box::new(ConstantSource(5)));
    gs.start();
    while gs.advance() {}
    let snap = gs.snapshot();
    assert!(snap.finished);

    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, Viewport::new(80, 24));
    let text = screen_text(&fb);
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("Player 1 150"));
}

#[test]
fn status_rows_show_key_hints_and_adapter_state() {
    let gs = scripted(vec![]);
    let snap = gs.snapshot();
    let view = ScoreboardView::default().with_anchor_y(AnchorY::Top);

    let off = view.render(&snap, Viewport::new(80, 24));
    let off_text = screen_text(&off);
    assert!(off_text.contains("[SPACE] roll"));
    assert!(off_text.contains("AI OFF"));

    let status = AdapterStatusView {
        enabled: true,
        client_count: 2,
        controller_id: Some(1),
        streaming_count: 1,
    };
    let on = view.render_with_adapter(&snap, Some(&status), Viewport::new(80, 24));
    let on_text = screen_text(&on);
    assert!(on_text.contains("AI ON"));
    assert!(!on_text.contains("AI OFF"));
}

#[test]
fn tiny_viewports_clip_without_panicking() {
    let mut gs = GameState::with_source(Box::new(ConstantSource(10)));
    gs.start();
    while gs.advance() {}
    let snap = gs.snapshot();
    let view = ScoreboardView::default();

    for (w, h) in [(0, 0), (1, 1), (10, 3), (40, 5), (69, 24)] {
        let fb = view.render(&snap, Viewport::new(w, h));
        assert_eq!(fb.width(), w);
        assert_eq!(fb.height(), h);
    }
}

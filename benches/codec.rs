use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_client::core::board_view::START_PLACEMENT;
use chess_client::core::coords::PairConvention;
use chess_client::online_game::definitions::decode_frame;
use chess_client::{from_square, to_square, BoardView, ClientModel, Inbound, Intent, PieceId};

const MOVE_FRAME: &str = r#"{"requestType":"move","pieceId":5,"to":28,"captureId":12,"promote":0}"#;

fn overlay_frame() -> String {
    let mut grid = [[false; 8]; 8];
    for row in grid.iter_mut().skip(2).take(4) {
        row[4] = true;
    }
    serde_json::json!({ "requestType": "surrounding", "surrounding": grid }).to_string()
}

fn square_walk() -> u64 {
    let mut result = 0;
    for rank in 0..8 {
        for file in 0..8 {
            if let Ok(square) = to_square(rank, file) {
                if let Ok((r, f)) = from_square(square.index() as i64) {
                    result += (r + f) as u64;
                }
            }
        }
    }
    result
}

fn select_and_move(board: &BoardView) -> ClientModel {
    let Some(piece) = PieceId::new(5) else {
        return ClientModel::new(board.clone());
    };
    let model = ClientModel::new(board.clone());
    let (model, _) = model.handle_message(Inbound::Intent(Intent::SelectPiece(piece)));
    match decode_frame(MOVE_FRAME, PairConvention::ZeroIndexed) {
        Ok(frame) => model.handle_message(Inbound::Frame(frame)).0,
        Err(_) => model,
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let overlay = overlay_frame();
    let board = BoardView::from_fen(START_PLACEMENT).unwrap();
    c.bench_function("decode move frame", |b| {
        b.iter(|| decode_frame(black_box(MOVE_FRAME), PairConvention::ZeroIndexed))
    });
    c.bench_function("decode overlay frame", |b| {
        b.iter(|| decode_frame(black_box(&overlay), PairConvention::ZeroIndexed))
    });
    c.bench_function("square walk", |b| b.iter(|| black_box(square_walk())));
    c.bench_function("seed from fen", |b| b.iter(|| BoardView::from_fen(black_box(START_PLACEMENT))));
    c.bench_function("select and move", |b| b.iter(|| select_and_move(black_box(&board))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

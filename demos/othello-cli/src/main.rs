use othello::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Color(Color),
    Order(TurnOrder),
    Move { x: usize, y: usize },
    Quit,
}

fn parse(line: &str) -> Result<Input, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["black"] => Ok(Input::Color(Color::Black)),
        ["white"] => Ok(Input::Color(Color::White)),
        ["first"] => Ok(Input::Order(TurnOrder::First)),
        ["second"] => Ok(Input::Order(TurnOrder::Second)),
        ["move", x, y] => {
            let x = x.parse().map_err(|_| format!("bad row: {x}"))?;
            let y = y.parse().map_err(|_| format!("bad column: {y}"))?;
            Ok(Input::Move { x, y })
        }
        ["quit"] | ["exit"] => Ok(Input::Quit),
        _ => Err("commands: black | white | first | second | move <row> <col> | quit".into()),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(view: &ViewState) -> String {
    let mut out = String::from("   0 1 2 3 4 5 6 7\n");
    // The authority indexes `board[x][y]` with `x` as the row.
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{x} "));
        for y in 0..BOARD_SIZE {
            let mark = match view.board.cell(x, y) {
                Some(Cell::Black) => 'B',
                Some(Cell::White) => 'W',
                _ => '.',
            };
            out.push(' ');
            out.push(mark);
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "black {} / white {}  [{}]",
        view.board.black(),
        view.board.white(),
        view.status
    ));
    out
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("othello=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| othello::DEFAULT_ENDPOINT.to_string());
    let client = GameClient::open(ClientConfig::default().with_endpoint(endpoint)).await?;

    let mut views = client.subscribe();
    let renderer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            println!("{}\n", render(&view));
            if !view.connected {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let verdict = match parse(&line) {
            Ok(Input::Color(color)) => client.choose_color(color).await?,
            Ok(Input::Order(order)) => client.choose_order(order).await?,
            Ok(Input::Move { x, y }) => client.submit_move(x, y).await?,
            Ok(Input::Quit) => break,
            Err(usage) => {
                eprintln!("{usage}");
                continue;
            }
        };
        if let Verdict::Rejected(reason) = verdict {
            eprintln!("rejected: {reason}");
        }
    }

    client.close().await?;
    renderer.abort();
    Ok(())
}

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use egg::{skip, Interpreter, PrintHandler};

async fn query(stdout: &mut io::Stdout, lines: &mut io::Lines<io::BufReader<io::Stdin>>) -> io::Result<Option<String>> {
    stdout.write_all("> ".as_bytes()).await?;
    stdout.flush().await?;
    lines.next_line().await
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // Printed lines are collected and written after each program, so they
    // go through the async stdout handle like everything else
    let output = PrintHandler::buffer();
    let interpreter = Interpreter::builder().with_output(output.clone()).build();
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = query(&mut stdout, &mut lines).await? {
        if skip(&line).is_empty() { continue; }

        let result = match interpreter.run(&line) {
            Ok(value) => format!("{}\n", value),
            Err(err) => format!("Error: {}\n", err),
        };
        stdout.write_all(output.take().as_bytes()).await?;
        stdout.write_all(result.as_bytes()).await?;
    }

    Ok(())
}

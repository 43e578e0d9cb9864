use super::*;
use regex::Regex;
use std::sync::LazyLock;

use super::utils::format_time;

static SECONDS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Seconds to move by. A leading `-` seeks backwards.
pub(crate) fn parse_seek_offset(time: &str) -> Option<i64> {
    let seconds: i64 = SECONDS_REGEX.find(time)?.as_str().parse().ok()?;
    Some(if time.trim_start().starts_with('-') {
        -seconds
    } else {
        seconds
    })
}

/// Seeks to a given position in a track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn seek(
    ctx: Context<'_>,
    #[rest]
    #[description = "Seconds to skip, negative to go back"]
    time: String,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    let playing = music
        .with_player(guild_id, |player| player.queue.is_playing())
        .await;
    if !playing {
        ctx.say(MusicError::NothingPlaying.to_string()).await?;
        return Ok(());
    }

    let Some(offset) = parse_seek_offset(&time) else {
        ctx.say("You need to specify the amount of seconds to skip!")
            .await?;
        return Ok(());
    };

    let Some(position) = or_report(ctx, music.seek(guild_id, offset).await).await? else {
        return Ok(());
    };
    ctx.say(format!("Moved track to **{}**", format_time(position)))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("30", Some(30))]
    #[test_case("-15", Some(-15))]
    #[test_case("skip 45s", Some(45))]
    #[test_case("forward", None)]
    fn parses_offsets(input: &str, expected: Option<i64>) {
        assert_eq!(parse_seek_offset(input), expected);
    }
}

/*!

This is the long-form manual for `ranked_traits` and `giftrank`.

## Ranking rules

Each respondent gives a score to every trait. For one respondent:

* the **top** traits are all the traits whose score is at least the third highest score,
* the **bottom** traits are all the traits whose score is at most the third lowest score.

The cutoffs are positional: with the scores `9, 8, 8, 2, 1`, the three highest scores are
`9, 8, 8` and the top cutoff is `8`, so the three traits scoring `9` or `8` are selected.
The three lowest scores are `1, 2, 8`: the bottom cutoff is also `8`, and four traits are
selected at the bottom. Ties at the cutoff are always included, which is why a respondent
may have more than three top (or bottom) traits, and why the same trait may appear in both
lists when the scores are flat. A respondent with fewer than three traits gets all of them
in both lists.

The number `3` can be changed with the `topCount` and `bottomCount` rules.

## Aggregation

The ranking is run for every respondent, and each trait receives one count for every
respondent who selected it. The resulting tables are sorted by decreasing count. Traits
with the same count stay in the order in which they were first selected. A trait that no
one selected does not appear at all.

For display, the traits down to the seventh one (`displayGroupSize`) are shown on their
own, together with any trait tied with the seventh. The rest is merged into a single
`Others` entry. The percentages are the share of respondents who selected the trait, so
they do not add up to 100.

## Input formats

### csv

The first row contains the trait names, the first column contains the names of the
respondents. The name of the first column is not significant.

```text
Name,Teaching,Mercy,Leadership,Giving
Alice,15,12,9,14
Bob,8,14,14,6
```

Every cell must hold a number. Names must be unique and not blank. Empty lines are
skipped and the cells are trimmed. A different delimiter can be set with the `delimiter`
option.

### xlsx

The same layout as `csv`, in an Excel worksheet. If the workbook contains more than one
worksheet, the name of the worksheet must be given with `excelWorksheetName`.

## Configuration

`giftrank` can be run with command line flags only:

```bash
giftrank -i raw_data.csv --export report.csv --charts
giftrank -i raw_data.csv --name Alice
```

or with a configuration file in JSON:

```json
{
  "outputSettings": {
    "surveyName": "Spiritual gifts 2024",
    "outputDirectory": "output",
    "summaryFile": "summary.json",
    "exportFile": "spiritual_gifts_analysis.csv",
    "generateCharts": true
  },
  "source": {
    "provider": "csv",
    "filePath": "raw_data.csv"
  },
  "rules": {
    "topCount": 3,
    "bottomCount": 3,
    "displayGroupSize": 7
  }
}
```

The paths are relative to the location of the configuration file. The flags given on the
command line override the values in the file. When `summaryFile` is missing or set to
`stdout`, the summary is printed on the standard output.

## Outputs

The summary lists, for the top and the bottom traits, the full tally and the display
grouping (featured traits with their percentage, and the `Others` entry or `null`).
A stored summary can be passed with `--reference`: the run fails and prints a diff if
the new summary differs from it.

The export has one line per respondent, in the order of the input:

```text
Name,Top Gifts,Bottom Gifts
Alice,"Teaching, Giving, Faith","Leadership, Service, Wisdom"
```

With `generateCharts`, two pie charts are written in SVG next to the summary:
`top_gifts.svg` and `bottom_gifts.svg`.

 */

/*!

This is the long-form manual for `nv_results` and `nvload`.

## Input files

Each results file comes with a mapping entry (see [`ElectionMapping`](crate::ElectionMapping))
that decides how the file is read:

* `rawUrl` is set: the results exist as structured XML. This format is not
  implemented and loading such a file fails.
* `preProcessedUrl` contains `precinct`: the file has one row per precinct.
* otherwise: the file has county totals.

The first row of a file holds the column names. Their order changes from one
file to the next, so only the names matter. The columns that are read are:

| column      | precinct files | county files |
|-------------|----------------|--------------|
| `office`    | yes            | yes          |
| `candidate` | yes            | yes          |
| `votes`     | yes            | yes          |
| `precinct`  | yes            |              |
| `party`     |                | yes          |

CSV files are encoded in Latin-1.

## The office column

Primary elections append the party between parentheses:

```text
GOVERNOR (DEM)
STATE SENATE, DISTRICT 5 (REP)
```

General elections do not:

```text
GOVERNOR
STATE SENATE, DISTRICT 5
```

The 2004 primary files drop the comma before the district:

```text
STATE SENATE DISTRICT 5 (DEM)
```

The years that use this layout are listed in `legacyDistrictYears` (default: 2004).

## Tracked offices

Only the following offices are loaded, unless `trackedOffices` is set in the
configuration:

```text
PRESIDENT AND VICE PRESIDENT OF THE UNITED STATES
PRESIDENT
UNITED STATES SENATOR
U.S. REPRESENTATIVE IN CONGRESS
GOVERNOR
LIEUTENANT GOVERNOR
SECRETARY OF STATE
STATE TREASURER
STATE CONTROLLER
ATTORNEY GENERAL
STATE SENATE
STATE ASSEMBLY
```

## Vote counts

Counts may use thousands separators (`1,234`). In precinct files an empty cell
means that no count was reported and is recorded as `"N/A"`. In county files an
empty cell is an error.

## Output

`nvload` writes one JSON object per line:

```json
{"election_id":"nv-2010-06-08-primary","state":"NV","source":"washoe__precinct.csv","start_date":"2010-06-08","election_type":"primary","reporting_level":"precinct","office":"GOVERNOR","party":"DEM","primary_party":"DEM","full_name":"Jane Doe","jurisdiction":"Ward 3","ocd_id":"ocd-division/country:us/state:nv/county:washoe/precinct:ward_3","votes":4500}
```

## Configuration

```json
{
  "state": "NV",
  "legacyDistrictYears": [2004],
  "elections": [
    {
      "election": "nv-2010-06-08-primary",
      "rawUrl": "",
      "preProcessedUrl": "20100608__nv__primary__washoe__precinct.csv",
      "ocdId": "ocd-division/country:us/state:nv/county:washoe",
      "name": "Washoe",
      "filePath": "20100608__nv__primary__washoe__precinct.csv"
    }
  ]
}
```

`filePath` is relative to the configuration file.

*/
